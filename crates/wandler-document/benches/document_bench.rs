// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the wandler-document crate: the Word → slide
// segmentation heuristic and the image enhancement pass applied before
// images are embedded in a PDF.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use wandler_document::ImageProcessor;
use wandler_document::slides::segment;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Segment a synthetic 2,000-paragraph document: a heading every tenth
/// paragraph, body text in between.
fn bench_segmentation(c: &mut Criterion) {
    let paragraphs: Vec<(String, Option<&str>)> = (0..2000)
        .map(|i| {
            if i % 10 == 0 {
                (format!("Section {}", i / 10), Some("Heading 1"))
            } else {
                (
                    format!("body paragraph number {i} with a little running text."),
                    Some("Normal"),
                )
            }
        })
        .collect();

    c.bench_function("segment (2000 paragraphs)", |b| {
        b.iter(|| {
            let slides = segment(
                paragraphs
                    .iter()
                    .map(|(text, style)| (text.as_str(), *style)),
                "bench",
            );
            black_box(slides);
        });
    });
}

/// Sharpness, contrast and brightness on a 512x512 gradient.
fn bench_enhancement(c: &mut Criterion) {
    let gradient = RgbImage::from_fn(512, 512, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let dynamic = DynamicImage::ImageRgb8(gradient);

    c.bench_function("prepare_for_pdf (512x512)", |b| {
        b.iter(|| {
            let prepared = ImageProcessor::from_dynamic(black_box(dynamic.clone()))
                .prepare_for_pdf(true, 2000);
            black_box(prepared.into_dynamic());
        });
    });
}

criterion_group!(benches, bench_segmentation, bench_enhancement);
criterion_main!(benches);
