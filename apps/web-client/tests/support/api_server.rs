//! A real `sso-api` server on an ephemeral port, trusting the test key set.

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::dev::{Service, ServerHandle};
use actix_web::{web, App, HttpServer};
use api_test_support::tokens::{trusted_jwks, TEST_AUDIENCE, TEST_ISSUER};
use jsonwebtoken::jwk::JwkSet;
use sso_api::middleware::{cors_middleware, JsonBody, RequestTrace, StructuredLogger, TraceSpan};
use sso_api::{routes, AppState, JwksCache, JwksVerifier};

pub struct TestApi {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    handle: ServerHandle,
}

impl TestApi {
    /// Number of requests the server has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

pub fn spawn_api() -> TestApi {
    let jwks: JwkSet = serde_json::from_value(trusted_jwks()).expect("valid test JWKS");
    let keys = Arc::new(JwksCache::from_key_set(&jwks));
    let state = AppState::new(Arc::new(JwksVerifier::new(keys, TEST_ISSUER, TEST_AUDIENCE)));
    let data = web::Data::new(state);
    let hits = Arc::new(AtomicUsize::new(0));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let counter = Arc::clone(&hits);
    let server = HttpServer::new(move || {
        let counter = Arc::clone(&counter);
        App::new()
            .wrap(JsonBody::default())
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap_fn(move |req, srv| {
                counter.fetch_add(1, Ordering::SeqCst);
                srv.call(req)
            })
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)
    .expect("listen on ephemeral port")
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    TestApi {
        base_url: format!("http://{addr}"),
        hits,
        handle,
    }
}
