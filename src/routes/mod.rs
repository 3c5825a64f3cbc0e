pub mod extract;
pub mod ocr;
