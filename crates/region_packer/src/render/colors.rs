use image::Rgb;

/// Colour definitions
pub struct Colors;

impl Colors {
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
}

/// Fixed colours for the zkEVM circuits so both panels and every run agree
fn circuit_color(name: &str) -> Option<Rgb<u8>> {
    let rgb = match name {
        "evm" => [64, 224, 208],             // turquoise
        "bytecode" => [255, 105, 180],       // hot pink
        "copy" => [75, 0, 130],              // indigo
        "exp" => [205, 198, 115],            // khaki
        "keccak" => [0, 139, 0],             // green
        "mpt" => [238, 221, 130],            // light goldenrod
        "rw" => [255, 160, 122],             // light salmon
        "tx" => [128, 128, 0],               // olive
        "pi" => [255, 69, 0],                // orange red
        "ecc" | "sig" => [190, 190, 190],    // gray
        _ => return None,
    };
    Some(Rgb(rgb))
}

const PALETTE: [[u8; 3]; 8] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [23, 190, 207],
];

/// Colour of a region: its circuit colour, or a palette entry chosen by catalog index
pub fn color_of(name: &str, index: usize) -> Rgb<u8> {
    circuit_color(name).unwrap_or(Rgb(PALETTE[index % PALETTE.len()]))
}

/// Black or white, whichever reads better on `background`
pub fn label_color(background: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = background.0;
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luma > 140.0 {
        Colors::BLACK
    } else {
        Colors::WHITE
    }
}
