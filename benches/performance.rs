use checkbox_block::{
    BlockHost, CaretPosition, ChecklistModel, Command, EditingEngine, RichText, ToolConfig,
    render::{RenderOptions, render_checklist},
    serial,
    theme::Theme,
};
use std::time::{Duration, Instant};

/// Performance benchmark suite for checklist operations
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Rendering of long checklists
/// - Splitting and merging items with Enter/Backspace
/// - Markup parsing and serialization
const SMALL_LIST_ITEMS: usize = 10;
const MEDIUM_LIST_ITEMS: usize = 100;
const LARGE_LIST_ITEMS: usize = 1000;
const HUGE_LIST_ITEMS: usize = 10000;

const ITERATIONS: usize = 100;

struct NullHost;

impl BlockHost for NullHost {
    fn current_block_index(&self) -> usize {
        0
    }

    fn insert_block_after(&mut self, _index: usize) {}

    fn set_focus_to_block(&mut self, _index: usize) {}
}

/// Create a checklist with the given number of items, some of them styled
fn create_test_checklist(num_items: usize) -> ChecklistModel {
    let mut model = ChecklistModel::empty();
    for i in 0..num_items {
        let markup = match i % 4 {
            0 => format!("Item {i} with <b>bold</b> and <i>italic</i> text"),
            1 => format!("Buy <a href=\"https://example.com/{i}\">thing {i}</a> today"),
            2 => format!("<mark>Highlighted</mark> note {i}<br>second line"),
            _ => format!("Plain item number {i} with a few more words in it"),
        };
        model.push(RichText::from_markup(&markup), i % 3 == 0, i % 3);
    }
    model
}

fn engine_for(num_items: usize) -> EditingEngine<NullHost> {
    EditingEngine::new(
        create_test_checklist(num_items),
        NullHost,
        ToolConfig::default(),
    )
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);

        if self.avg_duration.as_millis() > 100 {
            println!("\n⚠️  WARNING: Average duration > 100ms (user-perceptible lag)");
        } else if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (may drop frames)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..3 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = durations.iter().min().copied().unwrap_or_default();
    let max_duration = durations.iter().max().copied().unwrap_or_default();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

#[test]
fn bench_rendering_performance() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           RENDERING PERFORMANCE BENCHMARKS                     ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let theme = Theme::default();
    for (name, count) in [
        ("Small (10 items)", SMALL_LIST_ITEMS),
        ("Medium (100 items)", MEDIUM_LIST_ITEMS),
        ("Large (1000 items)", LARGE_LIST_ITEMS),
        ("Huge (10000 items)", HUGE_LIST_ITEMS),
    ] {
        let engine = engine_for(count);
        let caret = engine
            .model()
            .last_id()
            .map(|item| CaretPosition::new(item, 3));
        let options = RenderOptions {
            caret,
            ..RenderOptions::default()
        };
        let iterations = if count == HUGE_LIST_ITEMS { 10 } else { ITERATIONS };
        let result = benchmark(&format!("render_checklist - {name}"), iterations, || {
            let rendered = render_checklist(&engine, &theme, &options);
            assert!(rendered.cursor.is_some());
        });
        result.print();
    }
}

#[test]
fn bench_split_and_merge() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           SPLIT / MERGE BENCHMARKS                             ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    for (name, count) in [
        ("Medium (100 items)", MEDIUM_LIST_ITEMS),
        ("Large (1000 items)", LARGE_LIST_ITEMS),
    ] {
        let mut engine = engine_for(count);
        let Some(first) = engine.model().first_id() else {
            panic!("checklist should not be empty");
        };
        let before = engine.model().items()[0].content.to_markup();

        let result = benchmark(&format!("enter + backspace - {name}"), ITERATIONS, || {
            let split = engine.dispatch(Command::Enter, Some(CaretPosition::new(first, 12)));
            let caret = split.caret.resolve(engine.model(), None);
            engine.dispatch(Command::Backspace, caret);
        });
        result.print();

        assert_eq!(engine.model().len(), count);
        assert_eq!(engine.model().items()[0].content.to_markup(), before);
    }
}

#[test]
fn bench_serialization() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           SERIALIZATION BENCHMARKS                             ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let model = create_test_checklist(LARGE_LIST_ITEMS);
    let json = serial::to_json(&serial::save(&model)).unwrap();

    let result = benchmark("save + to_json - Large (1000 items)", ITERATIONS, || {
        let data = serial::save(&model);
        let _ = serial::to_json(&data).unwrap();
    });
    result.print();

    let result = benchmark("from_json - Large (1000 items)", ITERATIONS, || {
        let loaded = serial::from_json(&json).unwrap();
        assert_eq!(loaded.len(), LARGE_LIST_ITEMS);
    });
    result.print();
}
