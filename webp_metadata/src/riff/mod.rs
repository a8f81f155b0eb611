//! # RIFF
//!
//! A generic walker for RIFF containers.
//!
//! RIFF files are a 12-byte header (`RIFF`, a size, and a form type like
//! `WEBP`) followed by chunks. Each chunk has a [`FourCc`], a little-endian
//! length, its data, and a padding byte if the length is odd. `LIST` chunks
//! hold more chunks.
//!
//! The walker doesn't know anything about the chunks it finds. Instead, it
//! asks a [`RiffHandler`] what to do with each one.

use winnow::{Parser as _, error::EmptyError, token::take};

pub use self::{chunk::FourCc, error::RiffError};

mod chunk;
mod error;
mod header;

/// Decides which parts of a RIFF container are interesting, and receives
/// them.
pub trait RiffHandler {
    /// Whether to walk a container with this form type at all.
    fn should_accept_container_identifier(&self, identifier: FourCc) -> bool;

    /// Whether `code`'s data should be read and handed to
    /// [`RiffHandler::process_chunk`].
    fn should_accept_chunk(&self, code: FourCc) -> bool;

    /// Whether to descend into a `LIST` chunk of the given list type.
    fn should_accept_list_group(&self, code: FourCc) -> bool;

    /// Receives an accepted chunk's data.
    fn process_chunk(&mut self, code: FourCc, payload: &[u8]);

    /// Called when the container's framing is broken partway through.
    ///
    /// The walker stops after reporting.
    fn report_container_error(&mut self, message: &str);
}

/// Walks a RIFF container, calling `handler` for each chunk.
///
/// # Errors
///
/// Returns an error only if the input doesn't have a usable RIFF header.
/// Anything wrong after that point goes to
/// [`RiffHandler::report_container_error`].
pub fn walk(input: &[u8], handler: &mut impl RiffHandler) -> Result<(), RiffError> {
    let mut input = input;
    let header = header::riff_header(&mut input)?;
    log::trace!("Found RIFF header: {header:?}");

    if !handler.should_accept_container_identifier(header.form_type) {
        log::debug!(
            "Handler doesn't want `{}` containers. Not walking chunks.",
            header.form_type
        );
        return Ok(());
    }

    // the declared size counts the form type, which we've already read
    let declared_len = (header.size - 4) as usize;
    let body: &[u8] = match input.get(..declared_len) {
        Some(body) => body,
        None => {
            log::warn!(
                "RIFF header declares `{declared_len}` byte(s) of chunks, but only `{}` \
                are present. Walking what's there...",
                input.len()
            );
            input
        }
    };

    walk_chunks(body, handler);
    Ok(())
}

/// Walks a run of chunks, recursing into accepted `LIST`s.
fn walk_chunks(mut input: &[u8], handler: &mut impl RiffHandler) {
    while !input.is_empty() {
        // grab the chunk header
        let chunk = match chunk::chunk_header(&mut input) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Invalid RIFF chunk header. Stopping here. err: {e}");
                handler.report_container_error("Not enough data remains for a RIFF chunk header.");
                return;
            }
        };

        // ensure the chunk fits in what's left
        let len = chunk.len as usize;
        let Ok::<_, EmptyError>(data) = take(len).parse_next(&mut input) else {
            let message = format!(
                "Invalid RIFF chunk size for `{}`. Declared `{}` byte(s), but only `{}` remain.",
                chunk.fourcc,
                chunk.len,
                input.len()
            );
            log::error!("{message}");
            handler.report_container_error(&message);
            return;
        };

        if chunk.fourcc == FourCc::LIST {
            let mut list: &[u8] = data;
            let Ok::<_, EmptyError>(list_type) = chunk::fourcc(&mut list) else {
                let message = format!("Invalid RIFF `LIST` size: `{}` byte(s).", chunk.len);
                log::error!("{message}");
                handler.report_container_error(&message);
                return;
            };

            if handler.should_accept_list_group(list_type) {
                log::trace!("Descending into `LIST` of type `{list_type}`.");
                walk_chunks(list, handler);
            } else {
                log::trace!("Skipping `LIST` of type `{list_type}`.");
            }
        } else if handler.should_accept_chunk(chunk.fourcc) {
            log::trace!("Processing `{}` chunk (`{}` bytes).", chunk.fourcc, chunk.len);
            handler.process_chunk(chunk.fourcc, data);
        } else {
            log::trace!("Skipping `{}` chunk (`{}` bytes).", chunk.fourcc, chunk.len);
        }

        // if the chunk has an odd length, skip its padding byte
        if chunk.len % 2 == 1 {
            _ = take::<_, _, EmptyError>(1_usize)
                .void()
                .parse_next(&mut input);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::util::logger;

    use super::{FourCc, RiffError, RiffHandler, walk};

    /// Remembers everything the walker told it.
    #[derive(Debug, Default)]
    struct Recorder {
        accept_lists: bool,
        chunks: Vec<(FourCc, Vec<u8>)>,
        errors: Vec<String>,
    }

    impl RiffHandler for Recorder {
        fn should_accept_container_identifier(&self, identifier: FourCc) -> bool {
            identifier == *b"TEST"
        }

        fn should_accept_chunk(&self, code: FourCc) -> bool {
            code != *b"SKIP"
        }

        fn should_accept_list_group(&self, _code: FourCc) -> bool {
            self.accept_lists
        }

        fn process_chunk(&mut self, code: FourCc, payload: &[u8]) {
            self.chunks.push((code, payload.to_vec()));
        }

        fn report_container_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    /// helper: builds a chunk, with padding
    fn chunk(fourcc: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut bytes = fourcc.to_vec();
        bytes.extend((data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
        if data.len() % 2 != 0 {
            bytes.push(0_u8);
        }
        bytes
    }

    /// helper: wraps chunks in a RIFF header
    fn riff(form_type: &[u8; 4], chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut bytes = b"RIFF".to_vec();
        bytes.extend((body.len() as u32 + 4).to_le_bytes());
        bytes.extend_from_slice(form_type);
        bytes.extend(body);
        bytes
    }

    #[test]
    fn walks_chunks_in_order() {
        logger();

        let file = riff(
            b"TEST",
            &[
                chunk(b"ONE ", &[1, 2, 3]),
                chunk(b"SKIP", &[9; 4]),
                chunk(b"TWO ", &[4, 5]),
            ],
        );

        let mut recorder = Recorder::default();
        walk(&file, &mut recorder).unwrap();

        assert_eq!(
            recorder.chunks,
            vec![
                (FourCc(*b"ONE "), vec![1, 2, 3]),
                (FourCc(*b"TWO "), vec![4, 5]),
            ]
        );
        assert!(recorder.errors.is_empty());
    }

    #[test]
    fn ignores_unaccepted_containers() {
        logger();

        let file = riff(b"WAVE", &[chunk(b"fmt ", &[0; 16])]);
        let mut recorder = Recorder::default();

        assert_eq!(walk(&file, &mut recorder), Ok(()));
        assert!(recorder.chunks.is_empty());
        assert!(recorder.errors.is_empty());
    }

    #[test]
    fn lists_are_skipped_or_walked() {
        logger();

        let mut list_body = b"INFO".to_vec();
        list_body.extend(chunk(b"INAM", b"name"));
        let file = riff(b"TEST", &[chunk(b"LIST", &list_body), chunk(b"LAST", &[7])]);

        let mut skipping = Recorder::default();
        walk(&file, &mut skipping).unwrap();
        assert_eq!(skipping.chunks, vec![(FourCc(*b"LAST"), vec![7])]);

        let mut descending = Recorder {
            accept_lists: true,
            ..Default::default()
        };
        walk(&file, &mut descending).unwrap();
        assert_eq!(
            descending.chunks,
            vec![
                (FourCc(*b"INAM"), b"name".to_vec()),
                (FourCc(*b"LAST"), vec![7]),
            ]
        );
    }

    #[test]
    fn oversized_chunk_is_a_container_error() {
        logger();

        let mut bad = b"BIG ".to_vec();
        bad.extend(100_u32.to_le_bytes());
        bad.extend([0; 4]);
        let file = riff(b"TEST", &[chunk(b"OK  ", &[1, 1]), bad]);

        let mut recorder = Recorder::default();
        walk(&file, &mut recorder).unwrap();

        assert_eq!(recorder.chunks, vec![(FourCc(*b"OK  "), vec![1, 1])]);
        assert_eq!(recorder.errors.len(), 1);
        assert!(recorder.errors[0].contains("BIG "));
    }

    #[test]
    fn tiny_list_is_a_container_error() {
        logger();

        let file = riff(b"TEST", &[chunk(b"LIST", b"AB")]);
        let mut recorder = Recorder::default();
        walk(&file, &mut recorder).unwrap();

        assert!(recorder.chunks.is_empty());
        assert_eq!(recorder.errors.len(), 1);
    }

    #[test]
    fn truncated_chunk_header_is_a_container_error() {
        logger();

        let mut file = riff(b"TEST", &[chunk(b"ONE ", &[1, 2])]);
        file.extend(b"TW");
        let new_size = (file.len() - 8) as u32;
        file[4..8].copy_from_slice(&new_size.to_le_bytes());

        let mut recorder = Recorder::default();
        walk(&file, &mut recorder).unwrap();

        assert_eq!(recorder.chunks.len(), 1);
        assert_eq!(recorder.errors.len(), 1);
    }

    #[test]
    fn not_riff_is_an_error() {
        logger();

        let mut recorder = Recorder::default();
        assert_eq!(
            walk(b"\x89PNG\r\n\x1a\n\0\0\0\0", &mut recorder),
            Err(RiffError::NotRiff {
                found: FourCc(*b"\x89PNG")
            })
        );
    }

    #[test]
    fn truncated_container_walks_what_is_present() {
        logger();

        let mut file = riff(b"TEST", &[chunk(b"ONE ", &[1, 2])]);
        file[4..8].copy_from_slice(&1000_u32.to_le_bytes());

        let mut recorder = Recorder::default();
        walk(&file, &mut recorder).unwrap();

        assert_eq!(recorder.chunks, vec![(FourCc(*b"ONE "), vec![1, 2])]);
        assert!(recorder.errors.is_empty());
    }
}
