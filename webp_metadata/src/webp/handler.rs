use webp_metadata_types::{Directory, DirectoryKind};

use crate::{
    collector::Collector,
    embedded::{EmbeddedDecoders, exif_start_offset},
    riff::{FourCc, RiffHandler},
};

use super::{
    dimensions::{self, DimensionResult},
    error::WebpDecodeError,
    kind::ChunkKind,
};

/// Routes one chunk to the decoder for its kind, and appends whatever it
/// produces to `out`.
///
/// Chunks we don't recognize are ignored.
pub fn process(code: FourCc, payload: &[u8], out: &mut Collector, decoders: &EmbeddedDecoders) {
    match ChunkKind::from(code) {
        ChunkKind::Exif => {
            let start = exif_start_offset(payload);
            log::debug!("Sending `EXIF` chunk to the Exif decoder (starting at `{start}`).");
            out.extend(decoders.exif.extract(payload, start));
        }

        ChunkKind::Iccp => {
            log::debug!("Sending `ICCP` chunk to the ICC decoder.");
            out.extend(decoders.icc.extract(payload, 0));
        }

        ChunkKind::Xmp => {
            log::debug!("Sending `XMP ` chunk to the XMP decoder.");
            out.extend(decoders.xmp.extract(payload, 0));
        }

        ChunkKind::Vp8x => push_dimensions(code, dimensions::extended_header(payload), out),
        ChunkKind::Vp8l => push_dimensions(code, dimensions::lossless_header(payload), out),
        ChunkKind::Vp8 => push_dimensions(code, dimensions::lossy_header(payload), out),

        ChunkKind::Other(other) => {
            log::trace!("No decoder for `{other}` chunks. Ignoring it.");
        }
    }
}

fn push_dimensions(code: FourCc, result: DimensionResult, out: &mut Collector) {
    match result {
        None => (),
        Some(Ok(info)) => out.push(info.into_directory()),
        Some(Err(source)) => {
            let err = WebpDecodeError { chunk: code, source };
            log::error!("{err}");
            out.push(err.into_directory());
        }
    }
}

/// Tells the RIFF walker which parts of a WebP file we care about, and sends
/// those parts to [`process`].
#[derive(Debug)]
pub struct WebpHandler<'out, 'dec> {
    out: &'out mut Collector,
    decoders: &'dec EmbeddedDecoders,
}

impl<'out, 'dec> WebpHandler<'out, 'dec> {
    pub const FORM_TYPE: FourCc = FourCc(*b"WEBP");

    pub fn new(out: &'out mut Collector, decoders: &'dec EmbeddedDecoders) -> Self {
        Self { out, decoders }
    }
}

impl RiffHandler for WebpHandler<'_, '_> {
    fn should_accept_container_identifier(&self, identifier: FourCc) -> bool {
        identifier == Self::FORM_TYPE
    }

    fn should_accept_chunk(&self, code: FourCc) -> bool {
        ChunkKind::from(code).is_recognized()
    }

    // webp doesn't use `LIST`s
    fn should_accept_list_group(&self, _code: FourCc) -> bool {
        false
    }

    fn process_chunk(&mut self, code: FourCc, payload: &[u8]) {
        process(code, payload, self.out, self.decoders);
    }

    fn report_container_error(&mut self, message: &str) {
        self.out.push(Directory::error(DirectoryKind::Error, message));
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use webp_metadata_types::{Directory, DirectoryKind, TagValue, tags};

    use crate::{
        collector::Collector,
        embedded::{EmbeddedDecoder, EmbeddedDecoders},
        error::ReadError,
        riff::{FourCc, RiffHandler},
        util::logger,
    };

    use super::{WebpHandler, process, push_dimensions};

    /// Records the offsets it was called with, and returns canned output.
    #[derive(Debug, Default)]
    struct RecordingDecoder {
        calls: Rc<RefCell<Vec<(usize, usize)>>>,
        output: Vec<Directory>,
    }

    impl EmbeddedDecoder for RecordingDecoder {
        fn extract(&self, payload: &[u8], start_offset: usize) -> Vec<Directory> {
            self.calls.borrow_mut().push((payload.len(), start_offset));
            self.output.clone()
        }
    }

    /// A decoder that's only here to be replaced. Using it is a bug.
    #[derive(Debug)]
    struct Unreachable;

    impl EmbeddedDecoder for Unreachable {
        fn extract(&self, _payload: &[u8], _start_offset: usize) -> Vec<Directory> {
            panic!("this decoder should never be called");
        }
    }

    fn vp8x(flags: u8) -> Vec<u8> {
        let mut payload = vec![flags, 0, 0, 0];
        payload.extend([0xFF, 0x00, 0x00]);
        payload.extend([0x7F, 0x00, 0x00]);
        payload
    }

    #[test]
    fn extended_header_becomes_a_webp_directory() {
        logger();

        let mut out = Collector::new();
        process(
            FourCc(*b"VP8X"),
            &vp8x(0x10),
            &mut out,
            &EmbeddedDecoders::default(),
        );

        assert_eq!(out.len(), 1);
        let dir = &out.as_slice()[0];
        assert_eq!(dir.kind(), DirectoryKind::Webp);
        assert_eq!(dir.get_int(tags::webp::IMAGE_WIDTH), Some(256));
        assert_eq!(dir.get_int(tags::webp::IMAGE_HEIGHT), Some(128));
        assert_eq!(dir.get_bool(tags::webp::HAS_ALPHA), Some(false));
        assert_eq!(dir.get_bool(tags::webp::IS_ANIMATION), Some(false));
    }

    #[test]
    fn structurally_invalid_headers_add_nothing() {
        logger();

        let decoders = EmbeddedDecoders::default();
        let mut out = Collector::new();

        process(FourCc(*b"VP8X"), &[0; 9], &mut out, &decoders);
        process(FourCc(*b"VP8L"), &[0x2E, 0, 0, 0, 0], &mut out, &decoders);
        process(FourCc(*b"VP8 "), &[0; 10], &mut out, &decoders);
        process(FourCc(*b"VP8 "), &[0; 4], &mut out, &decoders);

        assert!(out.is_empty());
    }

    #[test]
    fn read_failures_become_one_error_directory() {
        logger();

        let mut out = Collector::new();
        out.push(Directory::error(DirectoryKind::Error, "already here"));

        let source = ReadError::OutOfBounds {
            offset: 7,
            len: 3,
            available: 8,
        };
        push_dimensions(FourCc(*b"VP8X"), Some(Err(source.clone())), &mut out);

        assert_eq!(out.len(), 2);
        let dir = &out.as_slice()[1];
        assert_eq!(dir.kind(), DirectoryKind::Webp);
        assert_eq!(dir.tag_count(), 0);
        assert_eq!(dir.errors().len(), 1);
        assert!(dir.errors()[0].contains("VP8X"));
        assert!(dir.errors()[0].contains(&source.to_string()));
    }

    #[test]
    fn delegates_see_the_right_offsets() {
        logger();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorder = || RecordingDecoder {
            calls: Rc::clone(&calls),
            output: Vec::new(),
        };
        let decoders = EmbeddedDecoders::default()
            .with_exif(recorder())
            .with_icc(recorder())
            .with_xmp(recorder());
        let mut out = Collector::new();

        let mut exif = b"Exif\0\0".to_vec();
        exif.extend([1, 2, 3, 4]);
        process(FourCc(*b"EXIF"), &exif, &mut out, &decoders);
        process(FourCc(*b"EXIF"), b"Exif\0", &mut out, &decoders);
        process(FourCc(*b"EXIF"), b"II*\0\x08\0\0\0", &mut out, &decoders);
        process(FourCc(*b"ICCP"), b"Exif\0\0icc", &mut out, &decoders);
        process(FourCc(*b"XMP "), b"Exif\0\0<x/>", &mut out, &decoders);

        assert_eq!(
            *calls.borrow(),
            vec![(10, 6), (5, 0), (8, 0), (9, 0), (10, 0)]
        );
        assert!(out.is_empty());
    }

    #[test]
    fn delegate_output_is_appended_verbatim() {
        logger();

        let canned = vec![
            Directory::new(DirectoryKind::Xmp).with(0xffff, TagValue::Int(0)),
            Directory::error(DirectoryKind::Xmp, "second"),
        ];
        let decoders = EmbeddedDecoders::default().with_xmp(RecordingDecoder {
            output: canned.clone(),
            ..Default::default()
        });

        let mut out = Collector::new();
        out.push(Directory::error(DirectoryKind::Error, "already here"));
        process(FourCc(*b"XMP "), b"<x/>", &mut out, &decoders);

        assert_eq!(out.len(), 3);
        assert_eq!(&out.as_slice()[1..], canned.as_slice());
    }

    #[test]
    fn unknown_chunks_are_a_no_op() {
        logger();

        let decoders = EmbeddedDecoders {
            exif: Box::new(Unreachable),
            icc: Box::new(Unreachable),
            xmp: Box::new(Unreachable),
        };
        let mut out = Collector::new();

        for code in [b"ALPH", b"ANMF", b"ANIM", b"exif", b"XMP\0"] {
            process(FourCc(*code), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], &mut out, &decoders);
        }

        assert!(out.is_empty());
    }

    #[test]
    fn handler_filters_what_the_walker_sends() {
        logger();

        let decoders = EmbeddedDecoders::default();
        let mut out = Collector::new();
        let mut handler = WebpHandler::new(&mut out, &decoders);

        assert!(handler.should_accept_container_identifier(FourCc(*b"WEBP")));
        assert!(!handler.should_accept_container_identifier(FourCc(*b"WAVE")));
        assert!(handler.should_accept_chunk(FourCc(*b"VP8L")));
        assert!(handler.should_accept_chunk(FourCc(*b"XMP ")));
        assert!(!handler.should_accept_chunk(FourCc(*b"ALPH")));
        assert!(!handler.should_accept_list_group(FourCc(*b"INFO")));

        handler.report_container_error("broken");
        assert_eq!(out.len(), 1);
        assert_eq!(out.as_slice()[0].kind(), DirectoryKind::Error);
        assert_eq!(out.as_slice()[0].errors(), &["broken".to_string()]);
    }
}
