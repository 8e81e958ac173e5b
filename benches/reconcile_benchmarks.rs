//! Benchmark: list reconciliation and signal propagation

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use reinhardt_ui::prelude::*;
use reinhardt_ui::utils::calc_levenshtein_operations;

fn benchmark_edit_script(c: &mut Criterion) {
	let mut group = c.benchmark_group("edit_script");
	for size in [10_usize, 100, 1000] {
		let old: Vec<usize> = (0..size).collect();
		// Swap the second and second-to-last items: prefix and suffix
		// trimming leave almost the whole list for the matrix.
		let mut new = old.clone();
		new.swap(1, size - 2);
		group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
			b.iter(|| calc_levenshtein_operations(black_box(&old), black_box(&new), |a, b| a == b))
		});
	}
	group.finish();
}

fn benchmark_keyed_list_append(c: &mut Criterion) {
	c.bench_function("keyed_list_append_100", |b| {
		b.iter(|| {
			let items = Signal::new((0..100_u32).collect::<Vec<_>>());
			let list = For::new(items.clone(), |item: &u32| *item).into_component();
			let container = Node::element("ul");
			let root = list.attach_to(&container).unwrap();
			items.update(|items| items.push(100));
			root.update();
			black_box(container.child_count())
		});
	});
}

fn benchmark_keyed_list_reverse(c: &mut Criterion) {
	let items = Signal::new((0..100_u32).collect::<Vec<_>>());
	let list = For::new(items.clone(), |item: &u32| *item).into_component();
	let container = Node::element("ul");
	let root = list.attach_to(&container).unwrap();

	c.bench_function("keyed_list_reverse_100", |b| {
		b.iter(|| {
			items.update(|items| items.reverse());
			root.update();
		});
	});
}

fn benchmark_batched_writes(c: &mut Criterion) {
	let signals: Vec<Signal<u64>> = (0..32).map(Signal::new).collect();
	let sum = Computed::new({
		let signals = signals.clone();
		move || signals.iter().map(Signal::get).sum::<u64>()
	});
	let _effect = Effect::new({
		let sum = sum.clone();
		move || {
			black_box(sum.get());
		}
	});

	c.bench_function("batched_writes_32", |b| {
		b.iter(|| {
			batch_effects(|| {
				for signal in &signals {
					signal.update(|value| *value += 1);
				}
			})
		});
	});
}

criterion_group!(
	benches,
	benchmark_edit_script,
	benchmark_keyed_list_append,
	benchmark_keyed_list_reverse,
	benchmark_batched_writes
);
criterion_main!(benches);
