//! Integration tests for the scored ZIP export.

use std::io::{Cursor, Read};

use photograde::batch::ImageBatch;
use photograde::export::{DEFAULT_COMMENT_LEN, scored_file_name, write_archive};
use photograde::scores::parse_scores;

fn png_bytes(shade: u8) -> Vec<u8> {
    let mut img = image::RgbaImage::new(2, 2);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgba([shade, shade, shade, 255]);
    }
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn test_batch(n: usize) -> ImageBatch {
    let mut batch = ImageBatch::new();
    for i in 0..n {
        batch.push_bytes(None, png_bytes(i as u8));
    }
    batch
}

fn entry_names(buf: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(buf)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

// ============================================================================
// Archive shape
// ============================================================================

#[test]
fn test_archive_has_exactly_one_entry_per_image() {
    let batch = test_batch(4);
    let csv = "No,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n\
               1,9,8,7,6,good\n\
               3,5,5,5,5,flat\n";
    let sheet = parse_scores(csv.as_bytes()).unwrap();

    let mut buf = Cursor::new(Vec::new());
    write_archive(&mut buf, &batch, Some(&sheet), DEFAULT_COMMENT_LEN).unwrap();

    let names = entry_names(buf.get_ref());
    assert_eq!(names.len(), 4);
    assert_eq!(names[0], "No1_9_8_7_6_good.png");
    assert_eq!(names[1], "No2_____.png", "unscored image keeps empty slots");
    assert_eq!(names[2], "No3_5_5_5_5_flat.png");
    assert_eq!(names[3], "No4_____.png");
}

#[test]
fn test_identical_scores_still_produce_unique_names() {
    let batch = test_batch(3);
    let csv = "No,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n\
               1,9,9,9,9,same\n\
               2,9,9,9,9,same\n\
               3,9,9,9,9,same\n";
    let sheet = parse_scores(csv.as_bytes()).unwrap();

    let mut buf = Cursor::new(Vec::new());
    write_archive(&mut buf, &batch, Some(&sheet), DEFAULT_COMMENT_LEN).unwrap();

    let mut names = entry_names(buf.get_ref());
    assert_eq!(names.len(), 3);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 3, "entry names must not collide");
}

#[test]
fn test_payload_bytes_are_unmodified() {
    let batch = test_batch(2);
    let mut buf = Cursor::new(Vec::new());
    write_archive(&mut buf, &batch, None, DEFAULT_COMMENT_LEN).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(buf.get_ref().as_slice())).unwrap();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, batch.get(i).unwrap().bytes, "entry {} payload", i);
    }
}

#[test]
fn test_empty_batch_is_rejected() {
    let batch = ImageBatch::new();
    let mut buf = Cursor::new(Vec::new());
    assert!(write_archive(&mut buf, &batch, None, DEFAULT_COMMENT_LEN).is_err());
}

// ============================================================================
// Entry naming
// ============================================================================

#[test]
fn test_entry_names_have_no_path_unsafe_characters() {
    let batch = test_batch(1);
    let csv = "No,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n\
               1,9,8,7,6,half/half: \"odd\" <name>?\n";
    let sheet = parse_scores(csv.as_bytes()).unwrap();

    let record = batch.get(0).unwrap();
    let attached = sheet.attach(&batch);
    let name = scored_file_name(record, attached[0], DEFAULT_COMMENT_LEN);

    for forbidden in ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\n'] {
        assert!(
            !name.contains(forbidden),
            "entry name {:?} contains {:?}",
            name,
            forbidden
        );
    }
    assert!(name.starts_with("No1_9_8_7_6_"));
    assert!(name.ends_with(".png"));
}

#[test]
fn test_comment_is_truncated_to_the_configured_length() {
    let batch = test_batch(1);
    let long_reason = "x".repeat(80);
    let csv = format!(
        "No,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n1,9,8,7,6,{}\n",
        long_reason
    );
    let sheet = parse_scores(csv.as_bytes()).unwrap();

    let record = batch.get(0).unwrap();
    let attached = sheet.attach(&batch);
    let name = scored_file_name(record, attached[0], 10);

    assert_eq!(name, format!("No1_9_8_7_6_{}.png", "x".repeat(10)));
}

#[test]
fn test_multibyte_comment_truncates_on_character_boundaries() {
    let batch = test_batch(1);
    let csv = "No,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n\
               1,9,8,7,6,構図と色彩が非常に優れている\n";
    let sheet = parse_scores(csv.as_bytes()).unwrap();

    let record = batch.get(0).unwrap();
    let attached = sheet.attach(&batch);
    let name = scored_file_name(record, attached[0], 4);

    assert_eq!(name, "No1_9_8_7_6_構図と色.png");
}

#[test]
fn test_extension_follows_payload_format() {
    let mut batch = ImageBatch::new();
    let mut jpg = Vec::new();
    let img = image::RgbImage::new(2, 2);
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut jpg), image::ImageFormat::Jpeg)
        .unwrap();
    batch.push_bytes(Some("shot.png".to_string()), jpg);

    let name = scored_file_name(batch.get(0).unwrap(), None, DEFAULT_COMMENT_LEN);
    assert_eq!(name, "No1_____.jpg");
}
