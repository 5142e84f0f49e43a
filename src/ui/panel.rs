// src/ui/panel.rs
//! Parameter panel
//!
//! One widget per [`ParamField`], grouped into collapsible sections. Edits go
//! through [`ParameterSet::set`], so values are clamped and snapped before
//! they are stored, and the generators they affect are returned to the caller.

use crate::{
    demo::{ParamField, ParameterSet, RegenerationRequest},
    gfx::{resources::material::TextureId, scene::SceneStatistics},
};

/// Read-only information shown under the controls
#[derive(Debug, Clone, Copy)]
pub struct PanelStatus {
    pub ready: bool,
    pub stats: SceneStatistics,
}

/// Draws the parameter panel and returns the regeneration it requests
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `params` - Parameter set edited in place
/// * `matcap_labels` - One entry per selectable matcap slot
/// * `status` - Loading state and scene statistics
pub fn parameter_panel(
    ui: &imgui::Ui,
    params: &mut ParameterSet,
    matcap_labels: &[String],
    status: &PanelStatus,
) -> RegenerationRequest {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return RegenerationRequest::none();
    }

    let mut request = RegenerationRequest::none();

    ui.window("Parameters")
        .size([340.0, 520.0], imgui::Condition::FirstUseEver)
        .position([display_size[0] - 360.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            if ui.collapsing_header("Material", imgui::TreeNodeFlags::DEFAULT_OPEN) {
                render_texture_combo(ui, params, matcap_labels);
            }

            if ui.collapsing_header("Text", imgui::TreeNodeFlags::DEFAULT_OPEN) {
                for field in [ParamField::Size, ParamField::Depth, ParamField::CurveSegments] {
                    request.merge(render_field(ui, params, field));
                }
            }

            if ui.collapsing_header("Bevel", imgui::TreeNodeFlags::empty()) {
                let mut enabled = params.text.bevel_enabled;
                if ui.checkbox(ParamField::BevelEnabled.label(), &mut enabled) {
                    request.merge(params.set_bevel_enabled(enabled));
                }
                for field in [
                    ParamField::BevelThickness,
                    ParamField::BevelSize,
                    ParamField::BevelOffset,
                    ParamField::BevelSegments,
                ] {
                    request.merge(render_field(ui, params, field));
                }
            }

            if ui.collapsing_header("Shapes", imgui::TreeNodeFlags::DEFAULT_OPEN) {
                for field in [
                    ParamField::SphereRadius,
                    ParamField::BoxSize,
                    ParamField::DonutSize,
                    ParamField::ItemCount,
                ] {
                    request.merge(render_field(ui, params, field));
                }
            }

            ui.separator();
            render_status(ui, status);
        });

    request
}

/// Matcap selection; changes apply on the next frame without regeneration
fn render_texture_combo(ui: &imgui::Ui, params: &mut ParameterSet, matcap_labels: &[String]) {
    if matcap_labels.is_empty() {
        ui.text_disabled("No matcaps configured");
        return;
    }

    let mut current = params.texture.0.min(matcap_labels.len() - 1);
    if ui.combo(
        ParamField::Texture.label(),
        &mut current,
        matcap_labels,
        |item| std::borrow::Cow::Borrowed(item),
    ) {
        params.set_texture(TextureId(current));
    }
}

/// Slider for one numeric field
fn render_field(ui: &imgui::Ui, params: &mut ParameterSet, field: ParamField) -> RegenerationRequest {
    let Some(range) = field.range() else {
        return RegenerationRequest::none();
    };

    let current = params.get(field);
    let edited = if field.is_integer() {
        let mut value = current.round() as i32;
        ui.slider_config(field.label(), range.min as i32, range.max as i32)
            .build(&mut value)
            .then_some(value as f32)
    } else {
        let mut value = current;
        ui.slider_config(field.label(), range.min, range.max)
            .display_format("%.3f")
            .build(&mut value)
            .then_some(value)
    };

    match edited {
        Some(value) => params.set(field, value),
        None => RegenerationRequest::none(),
    }
}

fn render_status(ui: &imgui::Ui, status: &PanelStatus) {
    if !status.ready {
        ui.text_colored([1.0, 0.8, 0.3, 1.0], "Loading typeface...");
        return;
    }
    ui.text(format!("Objects: {}", status.stats.object_count));
    ui.text(format!("Geometries: {}", status.stats.geometry_count));
    ui.text(format!("Triangles: {}", status.stats.total_triangles));
}
