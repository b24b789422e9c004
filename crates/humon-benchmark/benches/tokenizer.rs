use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static PUNCTUATION: &str = "
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
{ a: [b c] @d:e } // comment
{ a: [b c] @d:e } /* block */
";

static WORDS: &str =
    "It was the year when they finally immanentized the Eschaton 'It was the year' when they \
     \"finally immanentized\" the Eschaton It was the year when they finally immanentized the \
     `Eschaton` It was the year when they finally immanentized the Eschaton It was the year when \
     they finally ^^immanentized the\nEschaton^^ It was the year when they finally immanentized \
     the Eschaton It was the year when they finally immanentized the Eschaton It was the year \
     when they finally immanentized\\ the Eschaton It was the year when they finally";

static CANDIDATES: [(&str, &str); 2] =
    [("words", WORDS), ("punctuation_and_comments", PUNCTUATION)];

fn iterate(s: &str) {
    use humon_tokenizer::{TokenKind, Tokenizer};

    let mut tokenizer = Tokenizer::new(s, 4);

    loop {
        let token_index = tokenizer.next_token_index();
        let next_token = tokenizer.token(token_index);

        if next_token.kind == TokenKind::EOF {
            break;
        }

        black_box(next_token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
