// Tests for the chunk buffer and playback assembly
//
// These tests verify that fragments keep their order, empty fragments are
// dropped, and the assembled blob is the exact concatenation.

use chrono::{TimeZone, Utc};
use webcam_recorder::playback::{default_filename, extension_for, OBJECT_URL_PREFIX};
use webcam_recorder::{ChunkBuffer, PlaybackAssembler};

#[test]
fn test_chunk_buffer_keeps_arrival_order() {
    let mut buffer = ChunkBuffer::new();

    assert_eq!(buffer.push(vec![1]), Some(0));
    assert_eq!(buffer.push(vec![2, 2]), Some(1));
    assert_eq!(buffer.push(vec![3, 3, 3]), Some(2));

    let sizes: Vec<usize> = buffer.chunks().iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![1, 2, 3]);
    assert_eq!(buffer.total_bytes(), 6);
}

#[test]
fn test_chunk_buffer_discards_empty_chunks() {
    let mut buffer = ChunkBuffer::new();

    assert_eq!(buffer.push(Vec::new()), None);
    assert_eq!(buffer.push(vec![7; 10]), Some(0));
    assert_eq!(buffer.push(Vec::new()), None);

    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.total_bytes(), 10);
    assert!(buffer.chunks().iter().all(|c| !c.is_empty()));
}

#[test]
fn test_chunk_buffer_drain_empties() {
    let mut buffer = ChunkBuffer::new();
    buffer.push(vec![1, 2, 3]);
    buffer.push(vec![4]);

    let drained = buffer.drain();

    assert_eq!(drained.len(), 2);
    assert!(buffer.is_empty());
    assert_eq!(buffer.total_bytes(), 0);
    // Indices restart after draining
    assert_eq!(buffer.push(vec![5]), Some(0));
}

#[test]
fn test_assemble_concatenates_in_order() {
    let assembler = PlaybackAssembler::new("video/webm", None);
    let mut buffer = ChunkBuffer::new();
    buffer.push(vec![1]);
    buffer.push(vec![2, 2]);
    buffer.push(vec![3, 3, 3]);

    let artifact = assembler.assemble(&mut buffer);

    assert_eq!(artifact.data(), &[1, 2, 2, 3, 3, 3]);
    assert_eq!(artifact.size_bytes, 6);
    assert_eq!(artifact.len(), 6);
    assert_eq!(artifact.chunk_count, 3);
    assert_eq!(artifact.mime_type, "video/webm");
    assert!(buffer.is_empty(), "Buffer should be empty after assembly");
}

#[test]
fn test_assemble_size_is_sum_of_chunks() {
    let sizes = [4096usize, 17, 1, 2048, 333];
    let assembler = PlaybackAssembler::new("video/webm", None);
    let mut buffer = ChunkBuffer::new();
    for size in sizes {
        buffer.push(vec![0xab; size]);
    }

    let artifact = assembler.assemble(&mut buffer);

    assert_eq!(artifact.len(), sizes.iter().sum::<usize>());
}

#[test]
fn test_assemble_empty_session() {
    let assembler = PlaybackAssembler::new("video/webm", None);
    let mut buffer = ChunkBuffer::new();

    let artifact = assembler.assemble(&mut buffer);

    assert!(artifact.is_empty());
    assert_eq!(artifact.chunk_count, 0);
}

#[test]
fn test_artifact_urls_and_download() {
    let assembler = PlaybackAssembler::new("video/webm", None);
    let first = assembler.assemble(&mut ChunkBuffer::new());
    let second = assembler.assemble(&mut ChunkBuffer::new());

    assert!(first.url.starts_with(OBJECT_URL_PREFIX));
    assert!(first.url.ends_with(&first.id.to_string()));
    assert_ne!(first.url, second.url, "Each artifact gets its own URL");

    let download = first.download();
    assert_eq!(download.href, first.url);
    assert!(download.filename.starts_with("recording-"));
    assert!(download.filename.ends_with(".webm"));
}

#[test]
fn test_configured_download_filename() {
    let assembler = PlaybackAssembler::new("video/webm", Some("standup.webm".to_string()));
    let artifact = assembler.assemble(&mut ChunkBuffer::new());
    assert_eq!(artifact.download().filename, "standup.webm");

    // Blank names fall back to the generated one
    let assembler = PlaybackAssembler::new("video/mp4", Some("  ".to_string()));
    let artifact = assembler.assemble(&mut ChunkBuffer::new());
    assert!(artifact.filename.ends_with(".mp4"));
}

#[test]
fn test_default_filename_format() {
    let at = Utc.with_ymd_and_hms(2025, 10, 28, 9, 30, 5).unwrap();
    assert_eq!(
        default_filename("video/webm", at),
        "recording-20251028-093005.webm"
    );
}

#[test]
fn test_extension_for_media_types() {
    assert_eq!(extension_for("video/webm"), "webm");
    assert_eq!(extension_for("video/webm;codecs=vp8,opus"), "webm");
    assert_eq!(extension_for("video/mp4"), "mp4");
    assert_eq!(extension_for("video/x-matroska"), "mkv");
    assert_eq!(extension_for("video/ogg"), "ogv");
    assert_eq!(extension_for("video/avi"), "avi");
    assert_eq!(extension_for("nonsense"), "bin");
}
