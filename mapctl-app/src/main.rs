use mapctl::prelude::*;
use std::result::Result;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Standalone viewer for the map control
fn main() -> Result<(), Box<dyn std::error::Error>> {
    mapctl::init_logging();

    let control = build_control()?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("mapctl viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "mapctl-app",
        options,
        Box::new(move |cc| Box::new(ViewerApp::new(cc, control))),
    )?;

    Ok(())
}

struct ViewerApp {
    control: MapControl,
    selected_preset: String,
    last_box: Arc<Mutex<Option<LatLngBounds>>>,
    view_changes: Arc<AtomicUsize>,
    clicked: Arc<Mutex<Vec<String>>>,
}

fn places() -> [(&'static str, LatLng); 3] {
    [
        ("Berlin", LatLng::new(52.52, 13.405)),
        ("Vienna", LatLng::new(48.2082, 16.3738)),
        ("Zurich", LatLng::new(47.3769, 8.5417)),
    ]
}

fn build_control() -> mapctl::Result<MapControl> {
    let mut places_layer = GeometryLayer::new("places");
    for (name, position) in places() {
        places_layer.add_geometry(Geometry::point(name.to_lowercase(), position));
    }
    places_layer.add_geometry(Geometry::line_string(
        "route",
        places().iter().map(|(_, position)| *position).collect(),
    ));

    MapControlBuilder::new()
        .with_viewport_size(800.0, 600.0)
        .with_center_and_zoom(LatLng::new(50.0, 12.0), 5)
        .with_scale(true)
        .with_layer(Box::new(MapLayer::new("osm", Arc::new(MercatorAdapter::osm()))))
        .with_layer(Box::new(places_layer))
        .build()
}

impl ViewerApp {
    fn new(_cc: &eframe::CreationContext<'_>, mut control: MapControl) -> Self {
        let last_box = Arc::new(Mutex::new(None));
        let sink = last_box.clone();
        control.on(MapEventKind::BoxDragged, move |event| {
            if let MapEvent::BoxDragged { bounds, .. } = event {
                if let Ok(mut slot) = sink.lock() {
                    *slot = Some(*bounds);
                }
            }
        });

        let view_changes = Arc::new(AtomicUsize::new(0));
        let counter = view_changes.clone();
        control.on(MapEventKind::ViewChanged, move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let clicked = Arc::new(Mutex::new(Vec::new()));
        let clicks = clicked.clone();
        control.on(MapEventKind::GeometryClicked, move |event| {
            if let MapEvent::GeometryClicked { geometry_id, .. } = event {
                if let Ok(mut list) = clicks.lock() {
                    list.push(geometry_id.clone());
                }
            }
        });

        Self {
            control,
            selected_preset: String::new(),
            last_box,
            view_changes,
            clicked,
        }
    }

    fn location_presets(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Fly to:");

            for (name, target) in places() {
                if ui
                    .selectable_label(self.selected_preset == name, name)
                    .clicked()
                {
                    self.selected_preset = name.to_string();
                    if !self.control.move_to(target) {
                        log::info!("still moving, {} ignored", name);
                    }
                }
            }
        });
    }

    fn mouse_mode_selector(&mut self, ui: &mut egui::Ui) {
        let mut mode = self.control.mouse_mode();
        egui::ComboBox::from_label("Mouse mode")
            .selected_text(format!("{:?}", mode))
            .show_ui(ui, |ui| {
                for option in [
                    MouseMode::Panning,
                    MouseMode::PanningNoZoom,
                    MouseMode::Dragging,
                    MouseMode::DraggingNoZoom,
                ] {
                    ui.selectable_value(&mut mode, option, format!("{:?}", option));
                }
            });
        if mode != self.control.mouse_mode() {
            self.control.set_mouse_mode(mode);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.location_presets(ui);
                ui.separator();
                self.mouse_mode_selector(ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let center = self.control.current_coordinate();
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {}",
                        center.lat,
                        center.lng,
                        self.control.current_zoom()
                    ));
                });
            });
        });

        egui::SidePanel::left("debug_panel").resizable(true).show(ctx, |ui| {
            ui.heading("View");
            ui.separator();

            let mut scale = self.control.is_scale_visible();
            if ui.checkbox(&mut scale, "Scale bar").changed() {
                self.control.show_scale(scale);
            }
            let mut crosshairs = self.control.are_crosshairs_visible();
            if ui.checkbox(&mut crosshairs, "Crosshairs").changed() {
                self.control.show_crosshairs(crosshairs);
            }
            let mut wheel = self.control.mouse_wheel_events_enabled();
            if ui.checkbox(&mut wheel, "Wheel zoom").changed() {
                self.control.enable_mouse_wheel_events(wheel);
            }

            ui.horizontal(|ui| {
                if ui.button("Zoom in").clicked() {
                    self.control.zoom_in();
                }
                if ui.button("Zoom out").clicked() {
                    self.control.zoom_out();
                }
            });
            if ui.button("Show all places").clicked() {
                let points: Vec<LatLng> = places().iter().map(|(_, p)| *p).collect();
                self.control.set_view_and_zoom_in(&points);
            }

            ui.separator();
            ui.heading("Events");
            ui.label(format!(
                "View changes: {}",
                self.view_changes.load(Ordering::Relaxed)
            ));
            if let Ok(last_box) = self.last_box.lock() {
                if let Some(bounds) = *last_box {
                    ui.label(format!(
                        "Last box: ({:.3}, {:.3}) - ({:.3}, {:.3})",
                        bounds.south_west.lat,
                        bounds.south_west.lng,
                        bounds.north_east.lat,
                        bounds.north_east.lng
                    ));
                }
            }
            if let Ok(clicked) = self.clicked.lock() {
                if let Some(last) = clicked.last() {
                    ui.label(format!("Clicked: {}", last));
                }
            }
            ui.label(format!("Animating: {}", self.control.is_animating()));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(MapControlWidget::new(&mut self.control));
        });

        // Queue is drained by listeners; keep it from growing
        self.control.process_events();
    }
}
