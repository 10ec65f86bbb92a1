//! JSON HTTP API over the school dataset.
//!
//! | Route          | Response                                   |
//! |----------------|--------------------------------------------|
//! | `/schools?...` | `{total, page, total_pages, results}`      |
//! | `/slugs`       | every routable path                        |
//! | `/<slug>`      | one school, 404 when the slug is unknown   |

mod lifecycle;
mod response;
mod route;

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde_json::{Value as JsonValue, json};
use tiny_http::{Request, Server};

use super::common::Session;
use super::search::results_json;
use crate::config::AppConfig;
use crate::school::{Catalog, Page};
use crate::utils::plural::plural_count;
use crate::{debug, log};

use route::{Route, parse_target};

/// Worker threads answering requests.
const WORKERS: usize = 4;

/// Shared by every worker.
struct ApiState {
    session: Session,
    per_page: usize,
    /// Catalog of the most recently loaded dataset.
    catalog: RwLock<Option<Arc<Catalog>>>,
}

impl ApiState {
    /// Current catalog, rebuilt when the cache handed out a newer dataset.
    fn catalog(&self) -> Result<Arc<Catalog>> {
        let schools = self.session.schools()?;
        if let Some(catalog) = self.catalog.read().as_ref()
            && catalog.is_built_from(&schools)
        {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(Catalog::build(schools));
        debug!("serve"; "indexed {}", plural_count(catalog.slugs().len(), "slug"));
        *self.catalog.write() = Some(Arc::clone(&catalog));
        Ok(catalog)
    }
}

/// Load the dataset, bind and answer requests until Ctrl+C.
pub fn serve(config: &AppConfig, session: Session) -> Result<()> {
    let state = Arc::new(ApiState {
        session,
        per_page: config.search.per_page,
        catalog: RwLock::new(None),
    });
    let catalog = state.catalog()?;
    log!("serve"; "loaded {}", plural_count(catalog.schools().len(), "school"));

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    run_request_loop(&server, state)
}

fn run_request_loop(server: &Server, state: Arc<ApiState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .build()
        .context("Failed to create thread pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(&state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, state: &ApiState) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }
    debug!("serve"; "{} {}", request.method(), request.url());

    if !response::is_allowed_method(request.method()) {
        return response::respond_method_not_allowed(request);
    }

    let route = match parse_target(request.url()) {
        Ok(route) => route,
        Err(e) => return response::respond_error(request, 400, &e.to_string()),
    };

    let catalog = match state.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            log!("error"; "{:#}", e);
            return response::respond_error(request, 503, "dataset unavailable");
        }
    };

    match route {
        Route::Schools(params) => {
            let hits = params.query.apply(catalog.schools());
            let per_page = params.per_page.unwrap_or(state.per_page);
            let page = Page::of(hits.len(), params.page, per_page);
            response::respond_json(request, 200, &results_json(&catalog, &hits, page, None))
        }
        Route::Slugs => {
            let paths: Vec<String> = catalog.slugs().iter().map(|e| e.path()).collect();
            response::respond_json(request, 200, &json!(paths))
        }
        Route::School(slug) => match catalog.resolve(&slug) {
            Some((position, _)) => {
                response::respond_json(request, 200, &catalog.school_json(position))
            }
            None => response::respond_not_found(request),
        },
        Route::Root => response::respond_json(request, 200, &index(&catalog)),
    }
}

/// `GET /`: dataset size and the available routes.
fn index(catalog: &Catalog) -> JsonValue {
    json!({
        "schools": catalog.schools().len(),
        "routes": ["/schools", "/slugs", "/<slug>"],
    })
}
