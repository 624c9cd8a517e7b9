//! Render a message to out.png without touching a printer.
//!
//! Usage: preview <font.ttf> [text...]

use std::error::Error;

use posprint::{img, render, wrap, DEFAULT_THRESHOLD, PRINT_WIDTH};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let font_path = args.next().ok_or("usage: preview <font.ttf> [text...]")?;
    let text = {
        let rest: Vec<String> = args.collect();
        if rest.is_empty() {
            String::from("A/C ID   DATE   GMT   FLTN     CITY PAIR")
        } else {
            rest.join(" ")
        }
    };

    let font_bytes = std::fs::read(&font_path)?;
    let font = rusttype::Font::try_from_vec(font_bytes).ok_or("unreadable font")?;

    let lines = wrap::wrap(&text, 40);
    let page = render::render_lines(&font, &lines, PRINT_WIDTH, 15.0, 1.4);
    let bitmap = img::binarize(&page, DEFAULT_THRESHOLD, PRINT_WIDTH);
    bitmap.preview().save("out.png")?;
    log::info!("wrote out.png ({}x{})", bitmap.width(), bitmap.height());
    Ok(())
}
