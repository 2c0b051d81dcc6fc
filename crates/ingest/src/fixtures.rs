//! In-memory PDF builders for tests.

use lopdf::{Dictionary, Document, Object, Stream};

/// A PDF with one page per entry, each showing the given line in Helvetica.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let contents: Vec<String> = pages
        .iter()
        .map(|line| format!("BT /F1 12 Tf 72 700 Td ({}) Tj ET", escape(line)))
        .collect();
    build(&contents)
}

/// A PDF whose pages draw nothing, like a scan without a text layer.
pub fn blank_pdf(num_pages: usize) -> Vec<u8> {
    build(&vec![String::new(); num_pages])
}

/// A single page that selects font `/F9`, which its resources never define.
pub fn missing_font_pdf(line: &str) -> Vec<u8> {
    let content = format!("BT /F9 12 Tf 72 700 Td ({}) Tj ET", escape(line));
    build_pdf(&[content], false)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

fn build(contents: &[String]) -> Vec<u8> {
    build_pdf(contents, true)
}

/// Pages share one resource dictionary; `with_font` registers Helvetica as `/F1`.
fn build_pdf(contents: &[String], with_font: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let catalog_id = doc.new_object_id();

    let mut resources = Dictionary::new();
    if with_font {
        let font_id = doc.new_object_id();
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        doc.objects.insert(font_id, Object::Dictionary(font));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));
    }

    let mut page_ids = Vec::new();
    for content in contents {
        let page_id = doc.new_object_id();
        let content_id = doc.new_object_id();

        doc.objects.insert(
            content_id,
            Object::Stream(Stream::new(Dictionary::new(), content.clone().into_bytes())),
        );

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources.clone()));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );

        doc.objects.insert(page_id, Object::Dictionary(page_dict));
        page_ids.push(Object::Reference(page_id));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
    pages_dict.set("Kids", Object::Array(page_ids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog_dict = Dictionary::new();
    catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog_dict.set("Pages", Object::Reference(pages_id));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog_dict));

    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("in-memory PDF save cannot fail");
    buffer
}
