use crate::gui_bridge::model::FeedModel;
use crate::workflow::runner::{LayoutRequest, LayoutRunner};
use anyhow::{anyhow, Result};
use log::{error, info};
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{Filter, Rejection, Reply};

type SharedModel = Arc<RwLock<FeedModel>>;

#[derive(Debug)]
struct PoisonedModel;

impl warp::reject::Reject for PoisonedModel {}

fn read_model<T>(state: &SharedModel, read: impl FnOnce(&FeedModel) -> T) -> Result<T, Rejection> {
    state
        .read()
        .map(|guard| read(&*guard))
        .map_err(|_| warp::reject::custom(PoisonedModel))
}

/// `GET /cities`, `/boundaries`, `/config` and `/layout?yaw=&pitch=&scale=&select=&width=&height=`.
pub fn routes(
    state: SharedModel,
    runner: Arc<LayoutRunner>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let cities = warp::path("cities")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(|state: SharedModel| async move {
            read_model(&state, |model| warp::reply::json(&model.cities))
        });

    let boundaries = warp::path("boundaries")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(|state: SharedModel| async move {
            read_model(&state, |model| warp::reply::json(&model.boundaries))
        });

    let config = warp::path("config")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(|state: SharedModel| async move {
            read_model(&state, |model| warp::reply::json(&model.config))
        });

    let layout = warp::path("layout")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<LayoutRequest>())
        .and(state_filter)
        .and(runner_filter)
        .and_then(
            |request: LayoutRequest, state: SharedModel, runner: Arc<LayoutRunner>| async move {
                read_model(&state, |model| {
                    warp::reply::json(&runner.execute(model, &request))
                })
            },
        );

    cities.or(boundaries).or(config).or(layout)
}

/// Serves the feed model over HTTP from a background thread.
pub struct FeedBridge {
    state: SharedModel,
}

impl FeedBridge {
    pub fn new(model: FeedModel, runner: Arc<LayoutRunner>, bind: SocketAddr) -> Self {
        let state = Arc::new(RwLock::new(model));
        let filter = routes(state.clone(), runner);

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("feed bridge runtime failed to start: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(filter).try_bind_ephemeral(bind) {
                    Ok((addr, server)) => {
                        info!("feed bridge listening on http://{}", addr);
                        server.await;
                    }
                    Err(err) => error!("feed bridge could not bind {}: {}", bind, err),
                }
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: FeedModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("feed model lock poisoned"))?;
        *guard = model;
        info!(
            "[feed] cities: {}, boundary rings: {}, source: {:?}",
            guard.cities.len(),
            guard.ring_count(),
            guard.source
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[feed] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<FeedModel> {
        self.state.read().ok().map(|guard| guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{synthetic_cities, SyntheticConfig};
    use globecore::City;

    fn shared(model: FeedModel) -> SharedModel {
        Arc::new(RwLock::new(model))
    }

    #[test]
    fn feed_bridge_updates_state() {
        let bridge = FeedBridge::new(
            FeedModel::default(),
            Arc::new(LayoutRunner::new()),
            SocketAddr::from(([127, 0, 0, 1], 0)),
        );
        let model = FeedModel {
            cities: synthetic_cities(&SyntheticConfig::new(12, 2)),
            ..FeedModel::default()
        };
        bridge.publish(model).unwrap();
        assert_eq!(bridge.snapshot().unwrap().cities.len(), 12);
    }

    #[tokio::test]
    async fn cities_route_serves_the_model() {
        let filter = routes(shared(FeedModel::default()), Arc::new(LayoutRunner::new()));
        let response = warp::test::request()
            .method("GET")
            .path("/cities")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        let cities: Vec<City> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(cities.len(), 3);
        assert_eq!(cities[0].name, "Moscow");
    }

    #[tokio::test]
    async fn layout_route_reads_query_parameters() {
        let filter = routes(shared(FeedModel::default()), Arc::new(LayoutRunner::new()));
        let response = warp::test::request()
            .method("GET")
            .path("/layout?yaw=0&pitch=0&scale=1&select=New%20York&width=800&height=600")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 200);
        let report: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(report["selected"], "New York");
        assert_eq!(report["viewport"]["width"], 800.0);
        assert_eq!(report["entries"][0]["name"], "New York");
    }

    #[tokio::test]
    async fn unknown_paths_are_rejected() {
        let filter = routes(shared(FeedModel::default()), Arc::new(LayoutRunner::new()));
        let response = warp::test::request()
            .method("GET")
            .path("/payload")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    }
}
