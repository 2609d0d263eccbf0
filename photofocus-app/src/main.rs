use anyhow::{bail, Context};
use photofocus::{
    data::{FileFeedSource, HttpFeedSource, NominatimGeocoder},
    prelude::*,
};

/// Rendered popup height used for the simulated open
const DEMO_POPUP_HEIGHT: f64 = 260.0;
const FRAME: f64 = 1.0 / 60.0;

struct Args {
    feed: String,
    config: Option<String>,
    geocode: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut feed = None;
        let mut config = None;
        let mut geocode = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config = Some(args.next().context("--config needs a path")?),
                "--geocode" => geocode = true,
                _ if feed.is_none() => feed = Some(arg),
                other => bail!("unexpected argument {other:?}"),
            }
        }

        match feed {
            Some(feed) => Ok(Self {
                feed,
                config,
                geocode,
            }),
            None => bail!("usage: photofocus-app <images.json | URL> [--config config.json] [--geocode]"),
        }
    }
}

/// Ticks the map to rest, handing completion notices to the camera
fn settle(map: &mut Map, camera: &mut CameraChoreographer) {
    for event in map.run_until_idle(FRAME) {
        if let MapEvent::MoveEnd { transition } = event {
            log::info!(
                "{} landed at ({:.5}, {:.5}) zoom {:.2}",
                transition,
                map.center().lat,
                map.center().lng,
                map.zoom()
            );
            camera.on_transition_end(transition);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse()?;

    let config = match &args.config {
        Some(path) => PhotoFocusConfig::load(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => PhotoFocusConfig::default(),
    };

    let source: Box<dyn FeedSource> = if args.feed.starts_with("http://") || args.feed.starts_with("https://") {
        Box::new(HttpFeedSource::new(args.feed.clone())?)
    } else {
        Box::new(FileFeedSource::new(&args.feed))
    };
    let mut report = load_feed(source.as_ref())
        .await
        .with_context(|| format!("loading marker feed from {}", args.feed))?;

    if args.geocode {
        let geocoder = NominatimGeocoder::new()?;
        let looked_up = fill_missing_cities(&mut report.markers, &geocoder).await;
        log::info!("Geocoded {} markers without a city", looked_up);
    }

    let ranking = RankingEngine::new(config.reference);
    report.markers = ranking.rank(report.markers);
    for skipped in &report.skipped {
        log::warn!("record {} ({}) skipped: {}", skipped.index, skipped.path, skipped.reason);
    }

    let reference = config.reference.position();
    let mut map = Map::new(reference, 2.0, Point::new(1280.0, 800.0)).with_config(&config.map);
    let mut camera = CameraChoreographer::for_engine(&config, &map);
    if !camera.fit_to_markers(&mut map, report.bounds().as_ref()) {
        log::info!("No markers to show");
        return Ok(());
    }

    let clustering = Clustering::new(
        config.clustering.clone(),
        ClusterSizer::new(config.clusters.clone()),
    );
    let clusters = clustering.cluster(&map, &report.positions(), map.zoom());
    for (node, icon) in clusters.nodes.iter().zip(clustering.icons(&clusters)) {
        log::info!(
            "cluster at ({:.5}, {:.5}): {} markers, {:.1}px {}",
            node.position.lat,
            node.position.lng,
            node.child_count,
            icon.size,
            icon.class
        );
    }

    let markers = Marker::from_records(&report.markers);
    let Some(farthest) = markers.iter().find(|m| m.is_farthest()).map(|m| m.id().to_string()) else {
        return Ok(());
    };
    let mut popups = PopupManager::new();
    for marker in markers {
        popups.add_popup(marker.into_popup());
    }

    if let Some(record) = report.markers.iter().find(|m| m.is_farthest) {
        log::info!(
            "Farthest marker: {} in {} ({} km)",
            record.path,
            record.city,
            record.display_distance()
        );
    }

    popups
        .open(&farthest, &mut camera, &mut map, DEMO_POPUP_HEIGHT)
        .context("farthest marker has no popup")?;
    settle(&mut map, &mut camera);

    let outcome = popups.close(&mut camera, &mut map);
    log::info!("Popup closed: {:?}", outcome);
    settle(&mut map, &mut camera);

    log::info!(
        "Final view ({:.5}, {:.5}) zoom {:.2}, camera {:?}",
        map.center().lat,
        map.center().lng,
        map.zoom(),
        camera.state()
    );
    Ok(())
}
