use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};
use std::io::Cursor;

pub const POST_ID: &str = "post-1001";
pub const SAS_TOKEN: &str = "sv=2022-11-02&ss=b&srt=o&sp=w&sig=abc%2F123%3D";

/// Solid 8x8 PNG.
pub fn png(color: [u8; 4]) -> Vec<u8> {
    sized_png(8, 8, color)
}

pub fn sized_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    buffer
}

pub fn b64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Wire descriptor as the host sends it.
pub fn descriptor(file_name: &str, original_name: &str, mime: &str, data: &[u8]) -> Value {
    json!({
        "filename": file_name,
        "originalname": original_name,
        "mimetype": mime,
        "binarydata": b64(data),
        "thumbnail": ""
    })
}

pub fn image_descriptor(file_name: &str, original_name: &str) -> Value {
    descriptor(file_name, original_name, "image/png", &png([255, 0, 0, 255]))
}

pub fn video_descriptor(file_name: &str, thumbnail: &str, data: &[u8]) -> Value {
    let mut value = descriptor(file_name, file_name, "video/mp4", data);
    value["thumbnail"] = json!(thumbnail);
    value
}

/// Top-left pixel of a PNG payload.
pub fn first_pixel(data: &[u8]) -> [u8; 4] {
    let img = image::load_from_memory(data).unwrap().to_rgba8();
    img.get_pixel(0, 0).0
}
