use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::web::Data;
use actix_web::Error;
use actix_web::{get, web};
use diesel::prelude::*;
use futures::future::{ok, Ready};
use futures::Future;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::events;
use crate::server::Response;

/// request counters, shared by every worker
#[derive(Debug)]
pub struct Stats {
    pub requests: AtomicU32,
    pub errors: AtomicU32,
}

impl Stats {
    pub fn new() -> Stats {
        Stats {
            requests: AtomicU32::new(0u32),
            errors: AtomicU32::new(0u32),
        }
    }

    /// count a handled request, responses with a 5xx status count as errors
    fn record(&self, is_server_error: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);

        if is_server_error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[derive(Serialize, Debug)]
pub struct StatsResponse {
    pub requests: u32,
    pub errors: u32,
    pub active_db_connections: u32,
    pub idle_db_connections: u32,
    pub events: i64,
}

#[get("/stats")]
pub async fn route(stats: Data<Stats>, pool: Data<db::Pool>) -> Response {
    let state = pool.state();
    let stats = stats.into_inner();

    let events = web::block(move || {
        let conn = pool.get()?;
        let count = events::table.count().get_result::<i64>(&conn)?;
        Ok::<_, ServiceError>(count)
    })
    .await?;

    http_ok_json!(StatsResponse {
        requests: stats.requests.load(Ordering::Relaxed),
        errors: stats.errors.load(Ordering::Relaxed),
        active_db_connections: state.connections - state.idle_connections,
        idle_db_connections: state.idle_connections,
        events,
    });
}

#[derive(Debug)]
pub struct Middleware;

impl Middleware {
    pub fn default() -> Middleware {
        Middleware
    }
}

impl<S, B> Transform<S> for Middleware
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestCountMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestCountMiddleware { service })
    }
}

pub struct RequestCountMiddleware<S> {
    service: S,
}

impl<S, B> Service for RequestCountMiddleware<S>
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ServiceRequest) -> Self::Future {
        let stats = request.app_data::<Data<Stats>>().cloned();

        let fut = self.service.call(request);

        Box::pin(async move {
            let res = fut.await?;

            match stats {
                Some(stats) => stats.record(res.response().status().is_server_error()),
                None => error!("request stats are not registered"),
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_requests_and_errors() {
        let stats = Stats::new();

        stats.record(false);
        stats.record(true);
        stats.record(false);

        assert_eq!(stats.requests.load(Ordering::Relaxed), 3);
        assert_eq!(stats.errors.load(Ordering::Relaxed), 1);
    }
}
