use criterion::{Criterion, criterion_group, criterion_main};
use dragonstone_core::{FormatOptions, Position, ValidationOptions, analyze, complete, format_edits, symbol_at};
use std::hint::black_box;

const UNIT: &str = r#"module Shapes
  PI_ISH = 3
  #[ outline
     #[ nested ]#
  ]#
  class Circle
    def initialize(radius)
      @radius = radius
    end

    def area
      if @radius > 0
        PI_ISH * @radius * @radius
      else
        0
      end
    end

    def self.unit
      Circle.new(1)
    end
  end

  enum Kind
    Round = 1
    Square = 2
  end

  fun describe(shape) -> str
    case shape
    when 1
      "round"
    else
      "other # not a comment"
    end
  end
end
"#;

fn document(copies: usize) -> String {
    UNIT.repeat(copies)
}

// Full validation + symbol pass, the work done on every edit
fn bench_analyze(c: &mut Criterion) {
    let options = ValidationOptions::default();
    for copies in [1usize, 50] {
        let text = document(copies);
        c.bench_function(&format!("analyze_{}x", copies), |b| {
            b.iter(|| black_box(analyze(black_box(&text), &options)))
        });
    }
}

fn bench_format(c: &mut Criterion) {
    let text = document(50);
    let options = FormatOptions::default();
    c.bench_function("format_edits_50x", |b| {
        b.iter(|| black_box(format_edits(black_box(&text), &options)))
    });
}

// Requests that re-derive the symbol table from scratch
fn bench_requests(c: &mut Criterion) {
    let text = document(50);
    let at = Position::new(20, 8);
    c.bench_function("symbol_at_50x", |b| b.iter(|| black_box(symbol_at(&text, at))));
    c.bench_function("complete_50x", |b| b.iter(|| black_box(complete(&text, at))));
}

criterion_group!(benches, bench_analyze, bench_format, bench_requests);
criterion_main!(benches);
