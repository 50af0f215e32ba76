//! Print the layer tree of a document and the channels of every layer
//!
//! Usage: cargo run --example extract_image_data -- <file.psd>

use psd::prelude::*;
use psd::AnyLayeredFile;

fn describe<T: psd::Sample>(file: &LayeredFile<T>) {
    println!(
        "{}x{} {:?}, {}-bit {:?}",
        file.width(),
        file.height(),
        file.version(),
        file.bit_depth().bits(),
        file.color_mode()
    );

    for layer in file.flat_layers() {
        let depth = layer.common().address().len() - 1;
        let channels: Vec<String> = layer
            .channel_ids()
            .iter()
            .map(|info| format!("{:?}", info.id))
            .collect();
        println!(
            "{}{} [{}] {}x{} channels: {}{}",
            "  ".repeat(depth),
            file.layer_path(layer),
            layer.layer_type().name(),
            layer.width(),
            layer.height(),
            channels.join(", "),
            if layer.has_mask() {
                format!(", mask (default {})", layer.mask_default_color())
            } else {
                String::new()
            }
        );
    }

    if let Some(merged) = file.merged_image() {
        println!("merged image: {} channels", merged.channel_ids().count());
    }
}

fn main() -> PsdResult<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.psd".to_string());

    match AnyLayeredFile::read_file(&path)? {
        AnyLayeredFile::Eight(file) => describe(&file),
        AnyLayeredFile::Sixteen(file) => describe(&file),
        AnyLayeredFile::ThirtyTwo(file) => describe(&file),
    }
    Ok(())
}
