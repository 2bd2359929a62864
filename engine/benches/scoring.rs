// Copyright (C) 2020 Kevin Del Castillo Ramírez
//
// This file is part of review-system.
//
// review-system is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// review-system is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with review-system.  If not, see <http://www.gnu.org/licenses/>.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::helpfulness;
use engine::text::{jaccard_index, token_set};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use std::collections::HashSet;

const WORD_POOL: &[&str] = &[
    "salary", "management", "culture", "benefits", "growth", "office", "team", "remote",
    "project", "deadline", "review", "bonus", "training", "meeting", "process", "support",
    "flexible", "overtime", "career", "stack", "tools", "quarter", "goals", "feedback",
];

fn generate_text(words: usize) -> String {
    let mut rng = thread_rng();

    let mut text = Vec::with_capacity(words);
    for _ in 0..words {
        text.push(*WORD_POOL.choose(&mut rng).unwrap());
    }

    text.join(" ")
}

fn helpfulness_score(c: &mut Criterion) {
    let mut rng = thread_rng();
    let samples: Vec<(u32, u32)> = (0..1000)
        .map(|_| (rng.gen_range(0, 500), rng.gen_range(0, 500)))
        .collect();

    c.bench_function("helpfulness 1000", |bench| {
        bench.iter(|| {
            for (upvotes, downvotes) in &samples {
                helpfulness::score(black_box(*upvotes), black_box(*downvotes), true);
            }
        })
    });
}

fn jaccard_500_words(c: &mut Criterion) {
    let a: HashSet<String> = token_set(&generate_text(500));
    let b: HashSet<String> = token_set(&generate_text(500));

    c.bench_function("jaccard 500 words", |bench| {
        bench.iter(|| jaccard_index::<f64>(black_box(&a), black_box(&b)))
    });
}

fn tokenize_2000_chars(c: &mut Criterion) {
    let text = generate_text(300);

    c.bench_function("tokenize review", |bench| {
        bench.iter(|| token_set(black_box(&text)))
    });
}

criterion_group! {
    name = scoring;
    config = Criterion::default();
    targets = helpfulness_score, jaccard_500_words, tokenize_2000_chars
}

criterion_main!(scoring);
