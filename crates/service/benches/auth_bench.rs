use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::{AuthService, TokenService};
use service::auth::domain::{SignupInput, LoginInput};
use service::storage::memory::MemoryStore;

fn bench_login(c: &mut Criterion) {
    let svc = AuthService::new(Arc::new(MemoryStore::new()), TokenService::new("bench-secret", 3600));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.signup(SignupInput { name: "Bench".into(), email: "bench@example.com".into(), password: "Benchmark1".into(), image: None })).unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let session = rt.block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();
            svc.tokens().verify(&session.token).unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
