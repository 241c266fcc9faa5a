use crate::app::{DrawTarget, LoopMetricsSnapshot};

use super::font::{text_width_px, LINE_ADVANCE};

const PANEL_LEFT: i32 = 10;
const PANEL_TOP: i32 = 10;
const PANEL_INSET: i32 = 10;
const PANEL_BG_COLOR: [u8; 4] = [8, 12, 24, 153];
const TEXT_COLOR: [u8; 4] = [234, 241, 255, 255];
const TEXT_DIM_COLOR: [u8; 4] = [150, 168, 196, 255];
const FAILURE_BG_COLOR: [u8; 4] = [0, 0, 0, 255];
const FAILURE_TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const FAILURE_TEXT_LEFT: i32 = 30;
const FAILURE_TEXT_TOP: i32 = 50;

#[derive(Debug, Clone, Default)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(target: &mut dyn DrawTarget, data: &OverlayData) {
    let lines = build_overlay_lines(data);
    let widest = lines
        .iter()
        .map(|(line, _)| text_width_px(line))
        .max()
        .unwrap_or(0);
    let panel_width = widest + PANEL_INSET * 2;
    let panel_height = lines.len() as i32 * LINE_ADVANCE + PANEL_INSET * 2;
    target.fill_rect(
        PANEL_LEFT,
        PANEL_TOP,
        panel_width.max(0) as u32,
        panel_height.max(0) as u32,
        PANEL_BG_COLOR,
    );

    let mut y = PANEL_TOP + PANEL_INSET;
    for (line, color) in &lines {
        target.draw_text(PANEL_LEFT + PANEL_INSET, y, line, *color);
        y += LINE_ADVANCE;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<(String, [u8; 4])> {
    let mut lines: Vec<(String, [u8; 4])> = data
        .scene_lines
        .iter()
        .map(|line| (line.clone(), TEXT_COLOR))
        .collect();
    lines.push((format_metrics_line(&data.metrics), TEXT_DIM_COLOR));
    lines
}

fn format_metrics_line(metrics: &LoopMetricsSnapshot) -> String {
    format!(
        "fps:{:.0} dt:{:.1}ms clamp:{}",
        metrics.fps, metrics.frame_time_ms, metrics.clamped_frames
    )
}

/// Replaces the whole frame with a startup failure message.
pub(crate) fn draw_startup_failure(target: &mut dyn DrawTarget, lines: &[String]) {
    target.clear(FAILURE_BG_COLOR);
    let mut y = FAILURE_TEXT_TOP;
    for line in lines {
        target.draw_text(FAILURE_TEXT_LEFT, y, line, FAILURE_TEXT_COLOR);
        y += LINE_ADVANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FrameCanvas;
    use crate::assets::ImageStore;

    fn sample_data() -> OverlayData {
        OverlayData {
            metrics: LoopMetricsSnapshot {
                fps: 59.6,
                frame_time_ms: 16.7,
                clamped_frames: 2,
            },
            scene_lines: vec!["x:240.0 y:120.0".to_string(), "vx:0.0 vy:0.0".to_string()],
        }
    }

    #[test]
    fn scene_lines_come_first_then_metrics() {
        let lines = build_overlay_lines(&sample_data());
        let text: Vec<&str> = lines.iter().map(|(line, _)| line.as_str()).collect();
        assert_eq!(
            text,
            vec!["x:240.0 y:120.0", "vx:0.0 vy:0.0", "fps:60 dt:16.7ms clamp:2"]
        );
    }

    #[test]
    fn overlay_draws_translucent_panel() {
        let store = ImageStore::default();
        let mut frame = vec![0u8; 320 * 120 * 4];
        {
            let mut canvas = FrameCanvas::new(&mut frame, 320, 120, &store).expect("canvas");
            canvas.clear([100, 100, 100, 255]);
            draw_overlay(&mut canvas, &sample_data());
        }
        let offset = ((PANEL_TOP as usize + 1) * 320 + PANEL_LEFT as usize + 1) * 4;
        let panel_px = &frame[offset..offset + 4];
        assert!(panel_px[0] < 100 && panel_px[0] > 8, "got {panel_px:?}");
        assert_eq!(&frame[0..4], &[100, 100, 100, 255]);
    }

    #[test]
    fn startup_failure_clears_and_writes_text() {
        let store = ImageStore::default();
        let mut frame = vec![90u8; 400 * 100 * 4];
        {
            let mut canvas = FrameCanvas::new(&mut frame, 400, 100, &store).expect("canvas");
            draw_startup_failure(&mut canvas, &["Failed to load game assets.".to_string()]);
        }
        assert!(frame.chunks_exact(4).all(|px| px == FAILURE_BG_COLOR
            || px == FAILURE_TEXT_COLOR));
        assert!(frame.chunks_exact(4).any(|px| px == FAILURE_TEXT_COLOR));
    }
}
