// SPDX-License-Identifier: MIT
//
// The conversion form — drop zone, thumbnail grid with reorder/remove
// controls, size quota bar, output name field, export button, and the
// theme toggle. Pure reflection of AppState; all work is delegated to
// the service layer and the export pipeline.

use base64::{engine::general_purpose, Engine as _};
use dioxus::prelude::*;

use blattwerk_core::types::{format_file_size, StagedImage, MAX_TOTAL_BYTES};
use blattwerk_document::{ExportPhase, ExportRequest};

use crate::services::app_services::AppServices;
use crate::state::AppState;
use crate::theme::Palette;

#[component]
pub fn Convert() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let dark = state.read().dark_mode;
    let palette = Palette::for_mode(dark);

    let busy = state.read().is_busy();
    let uploading = state.read().uploading;
    let drag_active = state.read().drag_active;
    let item_count = state.read().collection.len();
    let total_size = state.read().collection.total_size();
    let quota_percent = (total_size as f64 / MAX_TOTAL_BYTES as f64) * 100.0;
    let bar_color = if quota_percent > 90.0 { "#ef4444" } else { palette.accent };

    // Intake from the file picker.
    let pick_files = {
        let svc = svc.clone();
        move |_| {
            if state.read().is_busy() {
                return;
            }
            #[cfg(not(any(target_os = "ios", target_os = "android")))]
            {
                let Some(paths) = rfd::FileDialog::new()
                    .add_filter(
                        "Images",
                        &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"],
                    )
                    .pick_files()
                else {
                    return;
                };
                let svc = svc.clone();
                spawn(async move {
                    state.write().begin_intake();
                    let current_total = state.read().collection.total_size();
                    let report = svc.ingest_paths(current_total, paths).await;
                    let mut s = state.write();
                    s.collection.extend(report.accepted);
                    s.finish_intake(report.last_error);
                });
            }
            #[cfg(any(target_os = "ios", target_os = "android"))]
            {
                let _ = &svc;
                tracing::warn!("file picker not available on this platform");
            }
        }
    };

    // Intake from drag-and-drop.
    let handle_drop = {
        let svc = svc.clone();
        move |evt: Event<DragData>| {
            evt.prevent_default();
            state.write().drag_active = false;
            if state.read().is_busy() {
                return;
            }
            let Some(engine) = evt.files() else { return };
            let svc = svc.clone();
            spawn(async move {
                state.write().begin_intake();
                // An entry the engine cannot read is kept with no bytes so
                // intake reports the read failure instead of dropping it
                // without a trace.
                let mut dropped: Vec<(String, Option<Vec<u8>>)> = Vec::new();
                for name in engine.files() {
                    let bytes = engine.read_file(&name).await;
                    dropped.push((name, bytes));
                }
                let current_total = state.read().collection.total_size();
                let report = svc.ingest_dropped(current_total, dropped);
                let mut s = state.write();
                s.collection.extend(report.accepted);
                s.finish_intake(report.last_error);
            });
        }
    };

    // Export the collection snapshot as a PDF and deliver it.
    let export_pdf = {
        let svc = svc.clone();
        move |_| {
            if !state.read().can_export() {
                return;
            }
            let request = {
                let s = state.read();
                ExportRequest {
                    pages: s.collection.iter().map(|item| item.bytes.clone()).collect(),
                    requested_name: s.output_name.clone(),
                    paper_size: s.config.paper_size,
                }
            };
            let svc = svc.clone();
            spawn(async move {
                state.write().begin_export();
                let mut phase_sink = state;
                let result = request
                    .run(move |phase| phase_sink.write().phase = phase)
                    .await;
                match result {
                    Ok(artifact) => match svc.deliver(&artifact) {
                        Ok(_) => state.write().settle_export(Ok(artifact)),
                        Err(err) => state.write().settle_export(Err(err)),
                    },
                    Err(err) => state.write().settle_export(Err(err)),
                }
            });
        }
    };

    // Presentation-only; persisted so the preference survives restarts.
    let toggle_theme = {
        let svc = svc.clone();
        move |_| {
            let mut s = state.write();
            s.dark_mode = !s.dark_mode;
            s.config.dark_mode = Some(s.dark_mode);
            if let Err(err) = svc.save_config(&s.config) {
                tracing::warn!(error = %err, "could not persist theme preference");
            }
        }
    };

    rsx! {
        div {
            style: "min-height: 100vh; background: {palette.page_bg}; display: flex; align-items: center; justify-content: center; padding: 16px; position: relative; font-family: system-ui, -apple-system, sans-serif;",

            // Theme toggle, independent of everything else
            button {
                style: "position: absolute; top: 16px; right: 16px; padding: 8px 12px; border-radius: 999px; border: none; background: {palette.card_bg}; color: {palette.text}; box-shadow: 0 2px 8px rgba(0,0,0,0.15); cursor: pointer;",
                onclick: toggle_theme,
                if dark { "Light" } else { "Dark" }
            }

            div {
                style: "background: {palette.card_bg}; border-radius: 12px; box-shadow: 0 4px 16px rgba(0,0,0,0.12); padding: 32px; width: 100%; max-width: 440px;",

                // Header
                div { style: "text-align: center; margin-bottom: 24px;",
                    h1 { style: "font-size: 24px; margin: 0; color: {palette.text};",
                        "Image to PDF Converter"
                    }
                    p { style: "color: {palette.subtext}; margin-top: 8px; font-size: 15px;",
                        "Convert your images to PDF format easily"
                    }
                }

                // Single-slot error banner
                if let Some(ref banner) = state.read().error {
                    div {
                        style: "margin-bottom: 16px; padding: 12px; background: #fee2e2; color: #b91c1c; border-radius: 8px; font-size: 14px;",
                        p { style: "margin: 0; font-weight: bold;", "{banner.message}" }
                        p { style: "margin: 4px 0 0 0;", "{banner.suggestion}" }
                    }
                }

                // Drop zone / picker
                div {
                    style: format!(
                        "border: 2px dashed {}; border-radius: 8px; padding: 24px; text-align: center; background: {}; cursor: {};",
                        if drag_active { palette.accent } else { palette.border },
                        if drag_active { palette.drop_active_bg } else { palette.drop_bg },
                        if busy { "wait" } else { "pointer" },
                    ),
                    ondragover: move |evt| {
                        evt.prevent_default();
                        state.write().drag_active = true;
                    },
                    ondragleave: move |_| {
                        state.write().drag_active = false;
                    },
                    ondrop: handle_drop,
                    onclick: pick_files,

                    if uploading {
                        p { style: "color: {palette.subtext}; margin: 0;", "Reading files..." }
                    } else {
                        p { style: "color: {palette.subtext}; margin: 0;",
                            "Click to add images or drag and drop"
                        }
                    }
                }

                if item_count > 0 {
                    // Quota bar
                    div { style: "margin-top: 16px; padding: 12px; border-radius: 8px; background: {palette.tile_bg};",
                        div { style: "display: flex; justify-content: space-between; margin-bottom: 8px; font-size: 13px; color: {palette.subtext};",
                            span { "Total Size: {format_file_size(total_size)}" }
                            span { "{format_file_size(MAX_TOTAL_BYTES)} max" }
                        }
                        div { style: "height: 8px; border-radius: 999px; background: {palette.bar_track}; overflow: hidden;",
                            div {
                                style: "height: 100%; border-radius: 999px; width: {quota_percent}%; background: {bar_color};",
                            }
                        }
                    }

                    // Thumbnail grid
                    div { style: "display: grid; grid-template-columns: repeat(2, 1fr); gap: 8px; margin-top: 16px;",
                        for (index, item) in state.read().collection.items().iter().enumerate() {
                            Thumbnail {
                                key: "{item.id}",
                                item: item.clone(),
                                index,
                                last_index: item_count - 1,
                                palette_tile: palette.tile_bg,
                            }
                        }
                    }

                    // Output name + export
                    input {
                        style: "width: 100%; box-sizing: border-box; margin-top: 16px; padding: 10px 12px; border-radius: 8px; border: 1px solid {palette.border}; background: {palette.card_bg}; color: {palette.text};",
                        r#type: "text",
                        placeholder: "Enter file name",
                        value: "{state.read().output_name}",
                        oninput: move |evt| {
                            state.write().output_name = evt.value();
                        },
                    }

                    button {
                        style: format!(
                            "width: 100%; margin-top: 12px; padding: 12px; border-radius: 8px; border: none; background: {}; color: white; font-size: 16px; font-weight: bold; cursor: pointer; opacity: {};",
                            palette.accent,
                            if state.read().can_export() { "1" } else { "0.5" },
                        ),
                        disabled: !state.read().can_export(),
                        onclick: export_pdf,
                        {export_button_label(&state.read().phase)}
                    }
                }
            }
        }
    }
}

fn export_button_label(phase: &ExportPhase) -> &'static str {
    match phase {
        ExportPhase::Normalizing => "Preparing images...",
        ExportPhase::Rendering => "Rendering PDF...",
        _ => "Download PDF",
    }
}

/// One tile in the grid: preview, size badge, remove, and boundary-hidden
/// move controls.
#[component]
fn Thumbnail(item: StagedImage, index: usize, last_index: usize, palette_tile: &'static str) -> Element {
    let mut state = use_context::<Signal<AppState>>();

    let data_uri = format!(
        "data:{};base64,{}",
        item.media_type,
        general_purpose::STANDARD.encode(item.bytes.as_slice())
    );
    let id = item.id;

    rsx! {
        div {
            style: "position: relative; border-radius: 8px; overflow: hidden; background: {palette_tile};",
            img {
                src: "{data_uri}",
                style: "width: 100%; height: 96px; object-fit: cover; display: block;",
            }
            // Remove
            button {
                style: "position: absolute; top: 4px; right: 4px; width: 24px; height: 24px; border-radius: 999px; border: none; background: #ef4444; color: white; cursor: pointer; line-height: 1;",
                onclick: move |_| {
                    state.write().collection.remove(id);
                },
                "\u{2715}"
            }
            // Reorder — hidden at the respective boundary
            div { style: "position: absolute; bottom: 4px; right: 4px; display: flex; gap: 4px;",
                if index > 0 {
                    button {
                        style: "width: 24px; height: 24px; border-radius: 999px; border: none; background: rgba(31,41,55,0.7); color: white; cursor: pointer; line-height: 1;",
                        onclick: move |_| {
                            state.write().collection.move_up(index);
                        },
                        "\u{2191}"
                    }
                }
                if index < last_index {
                    button {
                        style: "width: 24px; height: 24px; border-radius: 999px; border: none; background: rgba(31,41,55,0.7); color: white; cursor: pointer; line-height: 1;",
                        onclick: move |_| {
                            state.write().collection.move_down(index);
                        },
                        "\u{2193}"
                    }
                }
            }
            // Size badge
            span {
                style: "position: absolute; bottom: 4px; left: 4px; font-size: 11px; background: rgba(31,41,55,0.7); color: white; padding: 2px 8px; border-radius: 999px;",
                "{format_file_size(item.byte_size)}"
            }
        }
    }
}
