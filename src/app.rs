use crate::io::config::Config;
use crate::io::image::save_buffer;
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::{RenderOptions, Renderer};
use crate::scene::camera::{Camera, CameraInput};
use crate::scene::context::Scene;
use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use crate::scene::mesh::create_test_triangle;
use crate::scene::texture::Texture;
use crate::ui::input::CameraController;
use log::{info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use nalgebra::{Point3, Vector3};
use std::time::Instant;

/// Builds the scene from the configuration. Any missing resource is a
/// hard error; an empty model path selects the built-in test triangle.
fn build_scene(config: &Config) -> Result<Scene, String> {
    let mut mesh = if config.scene.model.is_empty() {
        info!("No model configured, using the built-in test triangle");
        create_test_triangle()
    } else {
        load_obj(&config.scene.model)?
    };
    mesh.translate(Vector3::from(config.scene.position));

    let mut material = if config.scene.model.is_empty() {
        Material::default()
    } else {
        Material::new(Texture::load(&config.scene.diffuse_texture)?)
    };
    if let Some(path) = &config.scene.normal_texture {
        material.normal_map = Some(Texture::load(path)?);
    }
    if let Some(path) = &config.scene.gloss_texture {
        material.gloss_map = Some(Texture::load(path)?);
    }
    if let Some(path) = &config.scene.specular_texture {
        material.specular_map = Some(Texture::load(path)?);
    }

    let light = DirectionalLight::new(
        Vector3::from(config.light.direction),
        config.light.intensity,
        Vector3::from(config.light.ambient),
    );

    Ok(Scene::new(vec![mesh], material, light))
}

fn build_camera(config: &Config) -> Camera {
    let mut camera = Camera::new(
        Point3::from(config.camera.origin),
        config.camera.fov,
        config.render.width,
        config.render.height,
    );
    camera.move_speed = config.camera.move_speed;
    camera.look_sensitivity = config.camera.look_sensitivity;
    camera.near = config.camera.near;
    camera.far = config.camera.far;
    camera.update(&CameraInput::default(), 0.0);
    camera
}

fn build_options(config: &Config) -> Result<RenderOptions, String> {
    Ok(RenderOptions {
        display_mode: config.pipeline.display_mode()?,
        shading_mode: config.pipeline.shading_mode()?,
        winding: config.pipeline.winding()?,
        use_clipping: config.pipeline.use_clipping,
        use_normal_map: config.pipeline.use_normal_map,
        clear_color: Vector3::from(config.render.background),
    })
}

/// Runs the interactive window loop.
pub fn run_gui(config: Config) -> Result<(), String> {
    let width = config.render.width;
    let height = config.render.height;

    info!("Starting GUI mode ({}x{})...", width, height);
    info!(
        "Controls: WASD=Move, Space/LeftShift=Up/Down, LeftClick=Look, \
         F4=Display mode, F5=Rotation, F6=Normal map, F7=Shading mode, \
         F8=Clipping, X=Screenshot"
    );

    let mut scene = build_scene(&config)?;
    let mut camera = build_camera(&config);
    let mut options = build_options(&config)?;
    let mut renderer = Renderer::new(width, height);
    let mut controller = CameraController::new();

    let mut window = Window::new("softras", width, height, WindowOptions::default())
        .map_err(|e| format!("Failed to create window: {}", e))?;
    window.set_target_fps(60);

    let mut buffer = vec![0u32; width * height];
    let mut rotating = config.scene.rotation_speed != 0.0;
    let mut last_frame_time = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Hot keys ---
        if window.is_key_pressed(Key::F4, KeyRepeat::No) {
            options.display_mode = options.display_mode.cycle();
            info!("Display mode: {:?}", options.display_mode);
        }
        if window.is_key_pressed(Key::F5, KeyRepeat::No) {
            rotating = !rotating;
            info!("Rotation: {}", rotating);
        }
        if window.is_key_pressed(Key::F6, KeyRepeat::No) {
            options.use_normal_map = !options.use_normal_map;
            info!("Normal map: {}", options.use_normal_map);
        }
        if window.is_key_pressed(Key::F7, KeyRepeat::No) {
            options.shading_mode = options.shading_mode.cycle();
            info!("Shading mode: {:?}", options.shading_mode);
        }
        if window.is_key_pressed(Key::F8, KeyRepeat::No) {
            options.use_clipping = !options.use_clipping;
            info!("Clipping: {}", options.use_clipping);
        }

        // --- Update ---
        let input = controller.poll(&window);
        camera.update(&input, dt);
        if rotating {
            for mesh in &mut scene.meshes {
                mesh.rotate_y(config.scene.rotation_speed * dt);
            }
        }

        // --- Render & display ---
        renderer.render(&mut scene, &camera, &options);
        renderer.present(&mut buffer);

        if window.is_key_pressed(Key::X, KeyRepeat::No) {
            let path = format!(
                "screenshot_{}.png",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            );
            match save_buffer(&buffer, width, height, &path) {
                Ok(()) => info!("Screenshot saved to {}", path),
                Err(e) => warn!("Screenshot failed: {}", e),
            }
        }

        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| format!("Failed to update window: {}", e))?;
        window.set_title(&format!("softras - {:.1} FPS", 1.0 / dt.max(1e-6)));
    }

    Ok(())
}

/// Renders a single frame without a window and writes it to the
/// configured output file.
pub fn run_headless(config: Config) -> Result<(), String> {
    info!("Starting headless mode...");

    let mut scene = build_scene(&config)?;
    let camera = build_camera(&config);
    let options = build_options(&config)?;
    let mut renderer = Renderer::new(config.render.width, config.render.height);

    let start_time = Instant::now();
    renderer.render(&mut scene, &camera, &options);
    info!("Render completed in {:.2?}", start_time.elapsed());

    let mut buffer = vec![0u32; config.render.width * config.render.height];
    renderer.present(&mut buffer);
    save_buffer(
        &buffer,
        config.render.width,
        config.render.height,
        &config.render.output,
    )?;

    Ok(())
}
