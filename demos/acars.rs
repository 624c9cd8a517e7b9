//! Print an ACARS-style message on a USB ESC/POS printer.
//!
//! Usage: acars <font.ttf> [vid pid [endpoint]]
//!
//! Renders the message at 40 columns, saves a debug preview to out.png and
//! sends init + raster + feed + cut to the device.

use std::collections::HashMap;
use std::error::Error;

use posprint::printer::Printer;
use posprint::{frame, img, render, template, wrap, DEFAULT_THRESHOLD, PRINT_WIDTH};

const ACARS_TEMPLATE: &str = "{open_date}\nACFT {reg}\n{message}\nPRINTED {print_date}";

const FONT_PX: f32 = 15.0;
const LINE_SPACING: f32 = 1.4;
const FEED_LINES: usize = 3;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let font_path = args.next().ok_or("usage: acars <font.ttf> [vid pid [endpoint]]")?;
    let vid = match args.next() {
        Some(v) => u16::from_str_radix(v.trim_start_matches("0x"), 16)?,
        None => 0x28e9,
    };
    let pid = match args.next() {
        Some(p) => u16::from_str_radix(p.trim_start_matches("0x"), 16)?,
        None => 0x0289,
    };
    let endpoint = match args.next() {
        Some(e) => Some(u8::from_str_radix(e.trim_start_matches("0x"), 16)?),
        None => None,
    };

    let font_bytes = std::fs::read(&font_path)?;
    let font = rusttype::Font::try_from_vec(font_bytes).ok_or("unreadable font")?;

    let mut fields = HashMap::new();
    fields.insert("open_date", "16/03/22   09:00:55   OPEN");
    fields.insert("print_date", "16/03/22 09:01:15");
    fields.insert("reg", "D-ABNW");
    fields.insert(
        "message",
        "EBBR DEP ATIS S 0850Z   ULLI 272030Z 00000MPS 4500 0600NE PRFG BR SCT025 06/05 Q1031 R10R/090060 TEMPO 0200 FG VV002",
    );

    let body = template::compose(ACARS_TEMPLATE, &fields)?;
    let lines = wrap::wrap(&body, 40);
    let page = render::render_lines(&font, &lines, PRINT_WIDTH, FONT_PX, LINE_SPACING);
    let bitmap = img::binarize(&page, DEFAULT_THRESHOLD, PRINT_WIDTH);

    bitmap.preview().save("out.png")?;
    log::info!(
        "message is {} lines, raster frame is {} bytes",
        lines.len(),
        frame::raster(&bitmap)?.len()
    );

    let mut printer = Printer::new(None, None, vid, pid, endpoint)?;
    let info = printer.info()?;
    log::info!("printing to {} {}", info.manufacturer, info.product);

    printer.chain_hwinit()?.chain_raster(&bitmap)?;
    printer.feed(FEED_LINES);
    printer.cut()?;
    printer.release()?;
    Ok(())
}
