use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};

const SERVER_CFG: &str = r#"// Server
hostname "My CS:GO server"
sv_cheats 0
sv_lan 0      // internet server
rcon_password "hunter2"

[rounds]
mp_maxrounds 30
mp_roundtime 1.92
mp_freezetime 15
mp_buytime 20

[bots]
bot_quota 10
bot_difficulty 2
bot_join_after_player true

[maps]
- de_dust2
- de_inferno
- de_mirage
"#;

#[derive(Serialize, Deserialize, Default)]
struct Rounds {
    mp_maxrounds: u32,
    mp_roundtime: f64,
    mp_freezetime: u32,
    mp_buytime: u32,
}

#[derive(Serialize, Deserialize, Default)]
struct Bots {
    bot_quota: u32,
    bot_difficulty: u8,
    bot_join_after_player: bool,
}

#[derive(Serialize, Deserialize, Default)]
struct Server {
    hostname: String,
    sv_cheats: u8,
    sv_lan: u8,
    rounds: Rounds,
    bots: Bots,
}

fn large_cfg(sections: usize) -> String {
    let mut text = String::new();
    for s in 0..sections {
        text.push_str(&format!("[section{s}]\n"));
        for k in 0..20 {
            text.push_str(&format!("key{k} \"value {s} {k}\" // comment {k}\n"));
        }
        text.push('\n');
    }
    text
}

fn benchmark_load(c: &mut Criterion) {
    c.bench_function("load_server_cfg", |b| {
        b.iter(|| csgo_cfg::load(black_box(SERVER_CFG)))
    });
}

fn benchmark_load_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_sections");
    for size in [1, 10, 100].iter() {
        let text = large_cfg(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| csgo_cfg::load(black_box(text.as_str())))
        });
    }
    group.finish();
}

fn benchmark_write(c: &mut Criterion) {
    let cfg = csgo_cfg::load(large_cfg(10).as_str()).unwrap();
    c.bench_function("write_10_sections", |b| {
        b.iter(|| csgo_cfg::writer::to_text(black_box(&cfg)))
    });
}

fn benchmark_mapping(c: &mut Criterion) {
    let cfg = csgo_cfg::load(SERVER_CFG).unwrap();
    let mut group = c.benchmark_group("mapping");

    group.bench_function("decode", |b| {
        b.iter(|| black_box(&cfg).decode::<Server>())
    });

    group.bench_function("map_to", |b| {
        let mut server = Server::default();
        b.iter(|| black_box(&cfg).map_to(&mut server))
    });

    let server: Server = cfg.decode().unwrap();
    group.bench_function("reflect_from", |b| {
        b.iter(|| {
            let mut out = csgo_cfg::empty();
            out.reflect_from(black_box(&server)).map(|_| out)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_load,
    benchmark_load_sizes,
    benchmark_write,
    benchmark_mapping
);
criterion_main!(benches);
