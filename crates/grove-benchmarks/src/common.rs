//! Common utilities for benchmarks

use camino::Utf8Path;
use criterion::Criterion;
use grove_core::types::PackageSpec;
use pprof::criterion::{Output, PProfProfiler};
use std::fs;

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

fn name(i: usize) -> String {
    format!("pkg_{}", i)
}

fn spec(i: usize) -> PackageSpec {
    PackageSpec::new(name(i), format!("/bench/{}", name(i)), false)
}

/// `pkg_0 <- pkg_1 <- ... <- pkg_{n-1}`, each depending on its predecessor
pub fn chain(n: usize) -> Vec<PackageSpec> {
    (0..n)
        .map(|i| {
            let spec = spec(i);
            if i == 0 {
                spec
            } else {
                spec.with_depends([name(i - 1)])
            }
        })
        .collect()
}

/// `pkg_0` depends on every other package, optionally on every second one
pub fn fan_out(n: usize) -> Vec<PackageSpec> {
    let mut packages: Vec<PackageSpec> = (1..n).map(spec).collect();
    let root = spec(0)
        .with_depends((1..n).step_by(2).map(name))
        .with_optional_depends((2..n).step_by(2).map(name));
    packages.push(root);
    packages
}

/// Rings of `ring` packages each, every ring closing a cycle
pub fn rings(n: usize, ring: usize) -> Vec<PackageSpec> {
    (0..n)
        .map(|i| {
            let start = i - i % ring;
            let next = start + (i - start + 1) % ring;
            spec(i).with_depends([name(next.min(n - 1))])
        })
        .collect()
}

/// Layered graph where every package depends on the whole previous layer,
/// plus one missing dependency per layer
pub fn layered(layers: usize, width: usize) -> Vec<PackageSpec> {
    let mut packages = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for slot in 0..width {
            let i = layer * width + slot;
            let mut spec = spec(i);
            if layer > 0 {
                spec = spec.with_depends(((layer - 1) * width..layer * width).map(name));
            }
            if slot == 0 {
                spec = spec.with_depends([format!("missing_{}", layer)]);
            }
            packages.push(spec);
        }
    }
    packages
}

/// Lay out `count` packages under `root`, grouping every `group_size` into a group
pub fn write_tree(root: &Utf8Path, count: usize, group_size: usize) -> std::io::Result<()> {
    for i in 0..count {
        let group = root.join(format!("group_{}", i / group_size));
        if i % group_size == 0 {
            fs::create_dir_all(&group)?;
            fs::write(group.join("modpack.conf"), "title = bench\n")?;
        }
        let dir = group.join(name(i));
        fs::create_dir_all(&dir)?;
        let depends = if i == 0 { String::new() } else { name(i - 1) };
        fs::write(
            dir.join("mod.conf"),
            format!("name = {}\ndepends = {}\noptional_depends = missing\n", name(i), depends),
        )?;
    }
    Ok(())
}
