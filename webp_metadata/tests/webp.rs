use webp_metadata::{
    Directory, DirectoryKind, EmbeddedDecoder, EmbeddedDecoders, RiffError, TagValue,
    read_metadata, read_metadata_with, tags,
};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// Builds one RIFF chunk, padded to an even length.
fn chunk(fourcc: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut bytes = fourcc.to_vec();
    bytes.extend((data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(data);
    if data.len() % 2 != 0 {
        bytes.push(0_u8);
    }
    bytes
}

/// Wraps the given chunks into a WebP file.
fn webp(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body = chunks.concat();
    let mut bytes = b"RIFF".to_vec();
    bytes.extend((body.len() as u32 + 4).to_le_bytes());
    bytes.extend(b"WEBP");
    bytes.extend(body);
    bytes
}

/// A big-endian Exif block with a `Make` and an `Orientation`.
fn exif_block() -> Vec<u8> {
    let mut bytes = b"MM\0\x2a".to_vec();
    bytes.extend(8_u32.to_be_bytes());

    bytes.extend(2_u16.to_be_bytes());
    // Make: ASCII, 4 bytes, inline
    bytes.extend(0x010f_u16.to_be_bytes());
    bytes.extend(2_u16.to_be_bytes());
    bytes.extend(4_u32.to_be_bytes());
    bytes.extend(b"Sony");
    // Orientation: SHORT, 1, inline
    bytes.extend(0x0112_u16.to_be_bytes());
    bytes.extend(3_u16.to_be_bytes());
    bytes.extend(1_u32.to_be_bytes());
    bytes.extend([0, 8, 0, 0]);

    bytes.extend(0_u32.to_be_bytes());
    bytes
}

/// A minimal ICC profile with an empty tag table.
fn icc_profile() -> Vec<u8> {
    let mut bytes = vec![0_u8; 132];
    bytes[0..4].copy_from_slice(&132_u32.to_be_bytes());
    bytes[8] = 2;
    bytes[8 + 1] = 0x10;
    bytes[12..16].copy_from_slice(b"mntr");
    bytes[16..20].copy_from_slice(b"RGB ");
    bytes[36..40].copy_from_slice(b"acsp");
    bytes
}

const XMP_PACKET: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
      <dc:creator><rdf:Seq><rdf:li>Someone</rdf:li></rdf:Seq></dc:creator>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>"#;

/// A 400x300 extended WebP with every kind of metadata chunk, in the order
/// that `libwebp` writes them.
fn make_webp_sample() -> Vec<u8> {
    // ICC, alpha, Exif, and XMP, as the container docs lay them out. Alpha is
    // read from `0x08`, which happens to be set here too
    let mut vp8x = vec![0b0011_1100, 0, 0, 0];
    vp8x.extend(&399_u32.to_le_bytes()[..3]);
    vp8x.extend(&299_u32.to_le_bytes()[..3]);

    let mut exif = b"Exif\0\0".to_vec();
    exif.extend(exif_block());

    let mut vp8 = vec![0x50, 0x1D, 0x00, 0x9D, 0x01, 0x2A];
    vp8.extend(400_u16.to_le_bytes());
    vp8.extend(300_u16.to_le_bytes());

    webp(&[
        chunk(b"VP8X", &vp8x),
        chunk(b"ICCP", &icc_profile()),
        chunk(b"ALPH", &[0; 7]),
        chunk(b"VP8 ", &vp8),
        chunk(b"EXIF", &exif),
        chunk(b"XMP ", XMP_PACKET.as_bytes()),
    ])
}

#[test]
fn full_sample() {
    logger();

    let file = make_webp_sample();
    let dirs = read_metadata(&file).unwrap();

    let kinds: Vec<DirectoryKind> = dirs.iter().map(Directory::kind).collect();
    assert_eq!(
        kinds,
        vec![
            DirectoryKind::Webp,
            DirectoryKind::Icc,
            DirectoryKind::Webp,
            DirectoryKind::ExifIfd0,
            DirectoryKind::Xmp,
        ]
    );
    assert!(dirs.iter().all(|d| !d.has_errors()));

    // `VP8X`
    let extended = &dirs.as_slice()[0];
    assert_eq!(extended.get_int(tags::webp::IMAGE_WIDTH), Some(400));
    assert_eq!(extended.get_int(tags::webp::IMAGE_HEIGHT), Some(300));
    assert_eq!(extended.get_bool(tags::webp::HAS_ALPHA), Some(true));
    assert_eq!(extended.get_bool(tags::webp::IS_ANIMATION), Some(false));

    // `VP8 `
    let lossy = &dirs.as_slice()[2];
    assert_eq!(lossy.get_int(tags::webp::IMAGE_WIDTH), Some(400));
    assert!(!lossy.contains(tags::webp::HAS_ALPHA));

    let icc = dirs.first_of(DirectoryKind::Icc).unwrap();
    assert_eq!(icc.get_str(tags::icc::PROFILE_VERSION), Some("2.1.0"));
    assert_eq!(icc.get_str(tags::icc::PROFILE_CLASS), Some("mntr"));

    let exif = dirs.first_of(DirectoryKind::ExifIfd0).unwrap();
    assert_eq!(exif.get_str(tags::exif::MAKE), Some("Sony"));
    assert_eq!(exif.get_int(tags::exif::ORIENTATION), Some(8));
    assert_eq!(exif.tag_name(tags::exif::ORIENTATION), Some("Orientation"));

    let xmp = dirs.first_of(DirectoryKind::Xmp).unwrap();
    assert_eq!(xmp.get_int(tags::xmp::XMP_VALUE_COUNT), Some(1));
    assert_eq!(
        xmp.get(tags::xmp::XMP_PROPERTIES),
        Some(&TagValue::Pairs(vec![(
            "dc:creator[1]".to_string(),
            "Someone".to_string()
        )]))
    );
}

#[test]
fn other_riff_files_are_ignored() {
    logger();

    let mut file = make_webp_sample();
    file[8..12].copy_from_slice(b"AVI ");

    assert!(read_metadata(&file).unwrap().is_empty());
}

#[test]
fn non_riff_files_are_errors() {
    logger();

    let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    assert!(matches!(
        read_metadata(png),
        Err(RiffError::NotRiff { .. })
    ));
    assert_eq!(read_metadata(&[0_u8; 0]), Err(RiffError::NoHeader));
}

#[test]
fn malformed_chunk_size_keeps_earlier_directories() {
    logger();

    let mut file = make_webp_sample();
    // cut the file in the middle of the `EXIF` chunk, but keep the header's
    // size pointing at the whole thing
    let exif_at = file
        .windows(4)
        .position(|w| w == b"EXIF")
        .unwrap();
    file.truncate(exif_at + 20);

    let dirs = read_metadata(&file).unwrap();
    let kinds: Vec<DirectoryKind> = dirs.iter().map(Directory::kind).collect();
    assert_eq!(
        kinds,
        vec![
            DirectoryKind::Webp,
            DirectoryKind::Icc,
            DirectoryKind::Webp,
            DirectoryKind::Error,
        ]
    );

    let error = dirs.first_of(DirectoryKind::Error).unwrap();
    assert_eq!(error.tag_count(), 0);
    assert!(error.errors()[0].contains("EXIF"));
}

#[test]
fn broken_exif_is_reported_in_place() {
    logger();

    let file = webp(&[
        chunk(b"EXIF", b"Exif\0\0XX\0\x2a"),
        chunk(b"VP8L", &[0x2F, 0x00, 0x00, 0x00, 0x00]),
    ]);

    let dirs = read_metadata(&file).unwrap();
    assert_eq!(dirs.len(), 2);
    assert_eq!(dirs.as_slice()[0].kind(), DirectoryKind::ExifIfd0);
    assert!(dirs.as_slice()[0].has_errors());
    assert_eq!(
        dirs.as_slice()[1].get_int(tags::webp::IMAGE_WIDTH),
        Some(1)
    );
}

/// Swaps in a decoder that only counts the bytes it was handed.
#[derive(Debug)]
struct LengthOnly;

impl EmbeddedDecoder for LengthOnly {
    fn extract(&self, payload: &[u8], start_offset: usize) -> Vec<Directory> {
        vec![
            Directory::new(DirectoryKind::ExifIfd0)
                .with(0, TagValue::Int((payload.len() - start_offset) as i64)),
        ]
    }
}

#[test]
fn custom_decoders_are_used() {
    logger();

    let file = make_webp_sample();
    let decoders = EmbeddedDecoders::default().with_exif(LengthOnly);

    let dirs = read_metadata_with(&file, &decoders).unwrap();
    let exif = dirs.first_of(DirectoryKind::ExifIfd0).unwrap();
    assert_eq!(exif.get_int(0), Some(exif_block().len() as i64));
}
