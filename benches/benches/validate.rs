// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use weave_model::{CellId, Geometry, Model, Style, StyleBuilder, keys};
use weave_view::GraphView;

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }
}

/// A grid of `groups` containers with `per_group` vertices each, and one edge
/// per vertex to a random vertex elsewhere.
fn build_diagram(groups: usize, per_group: usize, seed: u64) -> (Model, Vec<CellId>) {
    let mut model = Model::new();
    let layer = model.default_layer();
    let mut rng = Lcg::new(seed);
    let mut containers = Vec::with_capacity(groups);
    let mut vertices = Vec::with_capacity(groups * per_group);

    let ellipse = StyleBuilder::new().set(keys::PERIMETER, "ellipse").build();
    let elbow = StyleBuilder::new().set(keys::EDGE_STYLE, "elbow").build();

    for g in 0..groups {
        let x = (g % 16) as f64 * 400.0;
        let y = (g / 16) as f64 * 400.0;
        let group = model
            .insert_vertex(layer, Geometry::new(x, y, 360.0, 360.0), Style::default())
            .expect("layer exists");
        containers.push(group);
        for i in 0..per_group {
            let vx = (i % 6) as f64 * 60.0;
            let vy = (i / 6) as f64 * 60.0;
            let style = if i % 2 == 0 { ellipse.clone() } else { Style::default() };
            let v = model
                .insert_vertex(group, Geometry::new(vx, vy, 40.0, 30.0), style)
                .expect("group exists");
            vertices.push(v);
        }
    }
    for i in 0..vertices.len() {
        let j = rng.gen_range_usize(vertices.len());
        let geometry = if i % 3 == 0 {
            Geometry::edge().with_points([Point::new(50.0, 50.0)])
        } else {
            Geometry::edge()
        };
        model
            .insert_edge(layer, Some(vertices[i]), Some(vertices[j]), geometry, elbow.clone())
            .expect("terminals exist");
    }
    model.take_changes();
    (model, containers)
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("weave_view");
    group.sample_size(30);

    for &(groups, per_group) in &[(16_usize, 16_usize), (64, 32)] {
        let (model, containers) = build_diagram(groups, per_group, 0x5EED_0000_0000_0001);
        let cells = groups * per_group;

        group.bench_function(format!("validate_cold(cells={cells})"), |b| {
            b.iter_batched(
                GraphView::new,
                |mut view| {
                    black_box(view.validate(&model));
                    view
                },
                BatchSize::SmallInput,
            );
        });

        let mut warm = GraphView::new();
        warm.validate(&model);
        group.bench_function(format!("validate_clean(cells={cells})"), |b| {
            b.iter(|| black_box(warm.validate(&model)));
        });

        group.bench_function(format!("invalidate_one_group(cells={cells})"), |b| {
            b.iter(|| {
                warm.invalidate(&model, containers[0]);
                black_box(warm.validate(&model))
            });
        });

        group.bench_function(format!("revalidate_all(cells={cells})"), |b| {
            b.iter(|| black_box(warm.revalidate(&model)));
        });

        group.bench_function(format!("temporary_states(cells={cells})"), |b| {
            b.iter(|| {
                warm.with_temporary_states(&model, 0.5, &containers[..4], |v| {
                    black_box(v.graph_bounds())
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
