//! Symbol matching benchmarks
//!
//! Benchmarks normalized cross-correlation over a symbol-column region of
//! realistic size (440 px wide band strip) against growing template
//! libraries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{GrayImage, Luma};
use panelscan_core::{SymbolMatcher, SymbolTemplate, TemplateLibrary};

/// Draw a square ring (3 px stroke) of black ink at the given offset.
fn draw_ring(canvas: &mut GrayImage, x0: u32, y0: u32, size: u32) {
    for y in 0..size {
        for x in 0..size {
            let on_edge = x < 3 || y < 3 || x >= size - 3 || y >= size - 3;
            if on_edge {
                canvas.put_pixel(x0 + x, y0 + y, Luma([0u8]));
            }
        }
    }
}

fn ring_template(name: &str, size: u32) -> SymbolTemplate {
    let mut mask = GrayImage::from_pixel(size, size, Luma([0u8]));
    for y in 0..size {
        for x in 0..size {
            let on_edge = x < 3 || y < 3 || x >= size - 3 || y >= size - 3;
            if on_edge {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
    }
    SymbolTemplate::from_mask(name, mask)
}

/// Symbol-column strip with two glyph instances.
fn region() -> GrayImage {
    let mut strip = GrayImage::from_pixel(440, 190, Luma([255u8]));
    draw_ring(&mut strip, 40, 60, 48);
    draw_ring(&mut strip, 260, 70, 48);
    strip
}

fn bench_match_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_region");
    group.sample_size(20);

    let strip = region();
    let matcher = SymbolMatcher::default();

    for template_count in [1usize, 4, 12] {
        let templates: Vec<SymbolTemplate> = (0..template_count)
            .map(|i| ring_template(&format!("symbol{i}"), 32 + 4 * i as u32))
            .collect();
        let library = TemplateLibrary::from_templates(templates);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{template_count}_templates")),
            &library,
            |b, library| {
                b.iter(|| black_box(matcher.match_region(black_box(&strip), library)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_match_region);
criterion_main!(benches);
