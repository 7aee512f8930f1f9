use canvas::{CanvasInput, GlobeCanvas};
use feed::{feed_url, fetch_feed, FeedBundle};
use globecore::data::Dimension;
use globecore::geo::Viewport;
use globecore::{GeoPoint, GlobeError, GlobeView, InputEvent};
use iced::{
    time,
    widget::{button, column, row, text, text_input, Canvas, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use log::info;
use std::io;
use std::time::{Duration, Instant};

mod canvas;
mod feed;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Sustainable Globe".into()
}

/// Frame ticks only while a coast or ray transition is running.
fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    match &state.globe {
        Some(globe) if globe.is_animating() => time::every(FRAME_INTERVAL).map(Message::Frame),
        _ => Subscription::none(),
    }
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    globe: Option<GlobeView>,
    query: String,
    status: String,
    pointer_geo: Option<GeoPoint>,
    started: Instant,
    last_frame: Option<Instant>,
}

#[derive(Debug, Clone)]
enum Message {
    FeedLoaded(FeedBundle),
    Canvas { viewport: Viewport, input: CanvasInput },
    Frame(Instant),
    QueryChanged(String),
    SelectCity(String),
    ClearSearch,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let url = feed_url();
        info!("fetching globe feed from {}", url);
        (
            Visualizer {
                globe: None,
                query: String::new(),
                status: format!("Loading cities from {url}..."),
                pointer_geo: None,
                started: Instant::now(),
                last_frame: None,
            },
            Task::perform(fetch_feed(url), Message::FeedLoaded),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::FeedLoaded(bundle) => {
                let cities = bundle
                    .cities
                    .map_err(|err| GlobeError::FeedRead(io::Error::new(io::ErrorKind::Other, err)));
                let globe = GlobeView::from_feed(cities, bundle.boundaries, bundle.config);
                state.status = if globe.metrics().feed_fallbacks > 0 {
                    format!("Feed unavailable, showing {} built-in cities", globe.cities().len())
                } else {
                    format!(
                        "Loaded {} cities, {} boundaries",
                        globe.cities().len(),
                        globe.boundaries().len()
                    )
                };
                state.globe = Some(globe);
            }
            Message::Canvas { viewport, input } => {
                let time_ms = state.started.elapsed().as_secs_f64() * 1_000.0;
                let Some(globe) = state.globe.as_mut() else {
                    return Task::none();
                };
                globe.handle(InputEvent::Resize(viewport));
                let event = match input {
                    CanvasInput::Down(position) => InputEvent::PointerDown { position, time_ms },
                    CanvasInput::Move(position) => {
                        state.pointer_geo = globe.geo_at(position);
                        InputEvent::PointerMove { position, time_ms }
                    }
                    CanvasInput::Up => InputEvent::PointerUp,
                    CanvasInput::Left => {
                        state.pointer_geo = None;
                        InputEvent::PointerLeft
                    }
                    CanvasInput::Wheel(factor) => InputEvent::Wheel { factor },
                    CanvasInput::Resize => return Task::none(),
                };
                globe.handle(event);
            }
            Message::Frame(now) => {
                let elapsed = state
                    .last_frame
                    .map(|last| now.saturating_duration_since(last))
                    .unwrap_or(FRAME_INTERVAL);
                if let Some(globe) = state.globe.as_mut() {
                    globe.tick(elapsed.as_secs_f64() * 1_000.0);
                    state.last_frame = globe.is_animating().then_some(now);
                }
            }
            Message::QueryChanged(query) => {
                state.query = query;
            }
            Message::SelectCity(name) => {
                if let Some(globe) = state.globe.as_mut() {
                    if globe.select(&name) {
                        state.status = format!("Selected {name}");
                        state.query = name;
                    }
                }
            }
            Message::ClearSearch => {
                state.query.clear();
                if let Some(globe) = state.globe.as_mut() {
                    if globe.clear_selection() {
                        state.status = "Selection cleared".into();
                    }
                }
            }
            Message::ZoomIn => state.zoom(InputEvent::ZoomIn),
            Message::ZoomOut => state.zoom(InputEvent::ZoomOut),
            Message::ResetZoom => state.zoom(InputEvent::ResetZoom),
        }
        Task::none()
    }

    fn zoom(&mut self, event: InputEvent) {
        if let Some(globe) = self.globe.as_mut() {
            globe.handle(event);
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let Some(globe) = state.globe.as_ref() else {
            return Container::new(text(&state.status).size(18))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        let results = globe.search(&state.query).into_iter().fold(
            Column::new().spacing(4),
            |col, city| {
                col.push(
                    button(text(format!("{} ({:.0})", city.name, city.overall)).size(14))
                        .on_press(Message::SelectCity(city.name.clone()))
                        .width(Length::Fill)
                        .padding(6),
                )
            },
        );

        let zoom_controls = row![
            button("+").on_press(Message::ZoomIn).padding(8),
            button("-").on_press(Message::ZoomOut).padding(8),
            button("Reset").on_press(Message::ResetZoom).padding(8),
        ]
        .spacing(8);

        let camera = globe.camera_snapshot();
        let pointer = match state.pointer_geo {
            Some(geo) => format!("Pointer {:.2}°, {:.2}°", geo.lat, geo.lon),
            None => "Pointer off globe".into(),
        };

        let sidebar = column![
            text("City search").size(22),
            row![
                text_input("Type at least two letters", &state.query)
                    .on_input(Message::QueryChanged)
                    .padding(6),
                button("×").on_press(Message::ClearSearch).padding(6),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
            results,
            text("Zoom").size(18),
            zoom_controls,
            detail_panel(globe),
            text(&state.status).size(13),
            text(format!(
                "Yaw {:.1}  Pitch {:.1}  Scale {:.2}",
                camera.yaw, camera.pitch, camera.scale
            ))
            .size(12),
            text(pointer).size(12),
            legend(),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(300.0));

        let globe_canvas = Canvas::new(GlobeCanvas { view: globe })
            .width(Length::Fill)
            .height(Length::Fill);

        let layout = row![sidebar, globe_canvas]
            .spacing(12)
            .align_y(Alignment::Start);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Scores of the selected city, or of the hovered one when nothing is selected.
fn detail_panel(globe: &GlobeView) -> Element<'_, Message> {
    let focus = globe.selected().or_else(|| globe.hovered());
    let Some(city) = focus.and_then(|name| globe.cities().iter().find(|c| c.name == name)) else {
        return text("Hover or search for a city").size(13).into();
    };

    Dimension::ALL
        .iter()
        .fold(
            Column::new()
                .spacing(2)
                .push(text(format!("{}: {:.0}", city.name, city.overall)).size(16)),
            |col, dimension| {
                col.push(
                    text(format!(
                        "{} {:.0}",
                        dimension.label(),
                        city.metrics.get(*dimension)
                    ))
                    .size(13),
                )
            },
        )
        .into()
}

fn legend() -> Element<'static, Message> {
    column![
        text("Rays grow with the gap to 100").size(13),
        text("Planet ↑  People ←  Profit →  Progress ↓").size(12),
        text("Marker color darkens as the overall score rises").size(12),
    ]
    .spacing(2)
    .into()
}
