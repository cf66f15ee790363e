use criterion::{criterion_group, criterion_main, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};
use splay::splay_tree::bench::{bm_nop, bm_splay, bm_zig, gen_tree};
use splay::SplayTree;

fn bm_nop_baseline(c: &mut Criterion) {
    c.bench_function("Nop", |b| {
        let v = gen_tree::<usize>(1000);
        b.iter(|| bm_nop(&v))
    });
}

fn bm_zig_action(c: &mut Criterion) {
    c.bench_function("zig action", |b| {
        let v = gen_tree::<usize>(1000);
        b.iter(|| bm_zig(&v))
    });
}

fn bm_splay_action(c: &mut Criterion) {
    c.bench_function("splay action", |b| {
        let v = gen_tree::<usize>(1000);
        b.iter(|| bm_splay(&v))
    });
}

fn bm_insert_shuffled(c: &mut Criterion) {
    c.bench_function("insert 1000 shuffled keys", |b| {
        let mut keys: Vec<u32> = (0..1000).collect();
        keys.shuffle(&mut thread_rng());
        b.iter(|| {
            let mut tree = SplayTree::new();
            for &key in &keys {
                tree.insert(key);
            }
            tree
        })
    });
}

fn bm_find_random(c: &mut Criterion) {
    c.bench_function("find in 1000 keys", |b| {
        let mut tree: SplayTree<u32> = (0..1000).collect();
        b.iter(|| {
            let key = thread_rng().gen_range(0..2000);
            tree.find(&key)
        })
    });
}

criterion_group!(
    benches,
    bm_nop_baseline,
    bm_zig_action,
    bm_splay_action,
    bm_insert_shuffled,
    bm_find_random
);
criterion_main!(benches);
