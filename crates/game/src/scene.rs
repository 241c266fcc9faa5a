use engine::{
    visible_tile_rect, world_to_screen_px, AssetLoader, DrawTarget, InputSnapshot, LayerRepeat,
    ParallaxLayer, Scene, SceneCommand, TileSheet, Vec2, Viewport,
};
use tracing::{debug, info};

use crate::level::{build_world, PLAYER_SIZE, PLAYER_SPAWN};
use crate::resources::GameResources;
use crate::sim::{KinematicBody, Simulation};
use crate::tuning::Tuning;
use crate::SetupError;

const CLEAR_COLOR: [u8; 4] = [12, 18, 34, 255];
const SKY_SCALE: f32 = 2.0;
const SKY_PARALLAX: Vec2 = Vec2::new(0.2, 0.15);
const OCEAN_SCALE: f32 = 2.4;
const OCEAN_PARALLAX_X: f32 = 0.45;
const OCEAN_ALPHA: f32 = 0.9;
const OCEAN_BOTTOM_OFFSET_PX: f32 = 110.0;

pub struct PlatformerScene {
    sim: Simulation,
    resources: GameResources,
    tile_sheet: TileSheet,
}

impl PlatformerScene {
    pub fn new(sim: Simulation, resources: GameResources) -> Self {
        let render = &sim.tuning().render;
        let tile_sheet = TileSheet {
            image: resources.tile_sheet,
            source_tile_px: render.source_tile_px,
            columns: render.tile_sheet_columns,
        };
        Self {
            sim,
            resources,
            tile_sheet,
        }
    }

    /// Loads every image, then builds the level and the simulation around it.
    pub fn build(
        loader: &mut dyn AssetLoader,
        tuning: Tuning,
        viewport: Viewport,
    ) -> Result<Self, SetupError> {
        let resources = GameResources::load(loader)?;
        let world = build_world(tuning.world.tile_size_px)?;
        let body = KinematicBody::new(PLAYER_SPAWN, PLAYER_SIZE);
        let sim = Simulation::new(
            world,
            body,
            viewport.size(),
            resources.animations.frame_counts(),
            tuning,
        );
        Ok(Self::new(sim, resources))
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    fn draw_background(&self, target: &mut dyn DrawTarget, camera: Vec2) {
        target.draw_layer(&ParallaxLayer {
            image: self.resources.sky,
            scroll: Vec2::new(camera.x * SKY_PARALLAX.x, camera.y * SKY_PARALLAX.y),
            scale: SKY_SCALE,
            alpha: 1.0,
            repeat: LayerRepeat::Both,
        });
        target.draw_layer(&ParallaxLayer {
            image: self.resources.ocean,
            scroll: Vec2::new(camera.x * OCEAN_PARALLAX_X, 0.0),
            scale: OCEAN_SCALE,
            alpha: OCEAN_ALPHA,
            repeat: LayerRepeat::Horizontal {
                bottom_offset_px: OCEAN_BOTTOM_OFFSET_PX,
            },
        });
    }

    fn draw_tiles(&self, target: &mut dyn DrawTarget, camera: Vec2) {
        let world = self.sim.world();
        let tile_size = world.tile_size();
        let Some(rect) = visible_tile_rect(
            camera,
            target.viewport(),
            tile_size,
            world.width() as u32,
            world.height() as u32,
        ) else {
            return;
        };

        let dest_size = tile_size.round() as u32;
        for row in rect.y_min..=rect.y_max {
            for column in rect.x_min..=rect.x_max {
                let Some(visual) = world.kind_at(column as i32, row as i32).visual else {
                    continue;
                };
                let tile_origin = Vec2::new(column as f32 * tile_size, row as f32 * tile_size);
                let (x, y) = world_to_screen_px(tile_origin, camera);
                target.draw_tile(&self.tile_sheet, visual, x, y, dest_size);
            }
        }
    }

    /// The sprite is centred on the body horizontally and shares its bottom edge.
    fn draw_player(&self, target: &mut dyn DrawTarget, camera: Vec2) {
        let body = self.sim.body();
        let animator = self.sim.animator();
        let Some(frame) =
            self.resources
                .animations
                .frame(animator.state(), body.facing, animator.frame_index())
        else {
            return;
        };

        let render = &self.sim.tuning().render;
        let sprite_w = render.sprite_width_px as f32;
        let sprite_h = render.sprite_height_px as f32;
        let size = body.size();
        let anchor = Vec2::new(
            body.position.x - (sprite_w - size.x) / 2.0,
            body.position.y - (sprite_h - size.y),
        );
        let (x, y) = world_to_screen_px(anchor, camera);
        target.draw_sprite(frame, x, y, render.sprite_width_px, render.sprite_height_px);
    }
}

impl Scene for PlatformerScene {
    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        let events = self.sim.tick(dt_seconds, input);
        if events.jumped {
            debug!("player_jumped");
        }
        if events.landed {
            debug!(y = self.sim.body().position.y, "player_landed");
        }
        if events.respawned {
            let spawn = self.sim.body().spawn();
            info!(x = spawn.x, y = spawn.y, "player_respawned");
        }
        SceneCommand::None
    }

    fn render(&self, target: &mut dyn DrawTarget) {
        let camera = self.sim.camera().position;
        target.clear(CLEAR_COLOR);
        self.draw_background(target, camera);
        self.draw_tiles(target, camera);
        self.draw_player(target, camera);
    }

    fn debug_lines(&self) -> Vec<String> {
        let body = self.sim.body();
        vec![
            format!("x:{:.1} y:{:.1}", body.position.x, body.position.y),
            format!("vx:{:.1} vy:{:.1}", body.velocity.x, body.velocity.y),
            format!(
                "anim:{} ground:{}",
                self.sim.animator().state().as_str(),
                body.on_ground
            ),
        ]
    }

    fn shutdown(&mut self) {
        let body = self.sim.body();
        info!(x = body.position.x, y = body.position.y, "platformer_shutdown");
    }
}

#[cfg(test)]
mod tests {
    use engine::{AssetError, ImageHandle, ImageStore, InputAction, LoadedImage};

    use super::*;

    #[derive(Default)]
    struct StubLoader {
        store: ImageStore,
    }

    impl AssetLoader for StubLoader {
        fn load_image(&mut self, _path: &str) -> Result<ImageHandle, AssetError> {
            let image = LoadedImage::from_rgba(1, 1, vec![255; 4]).expect("image");
            Ok(self.store.insert(image))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum DrawCall {
        Clear,
        Tile { visual: u16, x: i32, y: i32, size: u32 },
        Sprite { x: i32, y: i32, w: u32, h: u32 },
        Layer(LayerRepeat),
    }

    struct RecordingTarget {
        viewport: Viewport,
        calls: Vec<DrawCall>,
    }

    impl RecordingTarget {
        fn new() -> Self {
            Self {
                viewport: Viewport {
                    width: 960,
                    height: 540,
                },
                calls: Vec::new(),
            }
        }
    }

    impl DrawTarget for RecordingTarget {
        fn viewport(&self) -> Viewport {
            self.viewport
        }
        fn clear(&mut self, _color: [u8; 4]) {
            self.calls.push(DrawCall::Clear);
        }
        fn draw_tile(&mut self, _sheet: &TileSheet, visual: u16, x: i32, y: i32, size: u32) {
            self.calls.push(DrawCall::Tile { visual, x, y, size });
        }
        fn draw_sprite(&mut self, _image: ImageHandle, x: i32, y: i32, w: u32, h: u32) {
            self.calls.push(DrawCall::Sprite { x, y, w, h });
        }
        fn draw_layer(&mut self, layer: &ParallaxLayer) {
            self.calls.push(DrawCall::Layer(layer.repeat));
        }
        fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _color: [u8; 4]) {}
        fn draw_text(&mut self, _x: i32, _y: i32, _text: &str, _color: [u8; 4]) {}
    }

    fn scene() -> PlatformerScene {
        let mut loader = StubLoader::default();
        PlatformerScene::build(
            &mut loader,
            Tuning::default(),
            Viewport {
                width: 960,
                height: 540,
            },
        )
        .expect("scene")
    }

    #[test]
    fn render_draws_layers_then_culled_tiles_then_player() {
        let mut scene = scene();
        for _ in 0..60 {
            scene.update(0.016, &InputSnapshot::empty());
        }
        let mut target = RecordingTarget::new();
        scene.render(&mut target);

        assert_eq!(target.calls[0], DrawCall::Clear);
        assert_eq!(target.calls[1], DrawCall::Layer(LayerRepeat::Both));
        assert!(matches!(
            target.calls[2],
            DrawCall::Layer(LayerRepeat::Horizontal { .. })
        ));
        assert!(matches!(
            target.calls.last(),
            Some(DrawCall::Sprite { w: 92, h: 92, .. })
        ));

        let tiles: Vec<_> = target
            .calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Tile { x, y, size, .. } => Some((*x, *y, *size)),
                _ => None,
            })
            .collect();
        assert!(!tiles.is_empty());
        for (x, y, size) in tiles {
            assert_eq!(size, 64);
            assert!(x >= -64 && x < 960, "tile x {x} outside viewport");
            assert!(y >= -64 && y < 540, "tile y {y} outside viewport");
        }
    }

    #[test]
    fn player_sprite_is_bottom_aligned_and_centred() {
        let mut scene = scene();
        for _ in 0..120 {
            scene.update(0.016, &InputSnapshot::empty());
        }
        let body = scene.simulation().body().clone();
        let camera = scene.simulation().camera().position;
        let mut target = RecordingTarget::new();
        scene.render(&mut target);

        let expected_x = (body.position.x - 30.0 - camera.x).floor() as i32;
        let expected_y = (body.position.y - 40.0 - camera.y).floor() as i32;
        assert_eq!(
            target.calls.last(),
            Some(&DrawCall::Sprite {
                x: expected_x,
                y: expected_y,
                w: 92,
                h: 92
            })
        );
    }

    #[test]
    fn debug_lines_report_position_and_velocity() {
        let mut scene = scene();
        scene.update(0.0, &InputSnapshot::empty());
        let lines = scene.debug_lines();
        assert_eq!(lines[0], "x:240.0 y:120.0");
        assert_eq!(lines[1], "vx:0.0 vy:0.0");
        assert_eq!(lines[2], "anim:jump ground:false");
    }

    #[test]
    fn update_never_requests_quit() {
        let mut scene = scene();
        let input = InputSnapshot::empty().with_pressed(InputAction::Jump);
        assert_eq!(scene.update(0.016, &input), SceneCommand::None);
    }
}
