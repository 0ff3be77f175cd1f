use anyhow::Context;
use glam::{Mat4, Quat, UVec2, Vec3};

use scenegraph::scene_graph::{
    Animable, AnimableGroup, Animation, AspectRatioPolicy, CachedTransformations, Camera, Drawable,
    DrawableGroup, Feature, FeatureHandle, ObjectId, TransformationMut,
};
use scenegraph::transformation::{
    AbstractTranslation, AbstractTranslationRotation, DualQuaternionTransformation, Transformation,
};
use scenegraph::{Scene, SceneConfig};

type DemoTransformation = DualQuaternionTransformation;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub frames: u32,
    pub frame_time: f32,
    pub planets: usize,
    pub orbit_spacing: f32,
    pub viewport: UVec2,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            frame_time: 1.0 / 60.0,
            planets: 3,
            orbit_spacing: 4.0,
            viewport: UVec2::new(1280, 720),
        }
    }
}

impl DemoConfig {
    /// Defaults, overridden by `DEMO_FRAMES` and `DEMO_PLANETS` if set.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(frames) = std::env::var("DEMO_FRAMES") {
            config.frames = frames.parse().context("DEMO_FRAMES must be a frame count")?;
        }
        if let Ok(planets) = std::env::var("DEMO_PLANETS") {
            config.planets = planets.parse().context("DEMO_PLANETS must be a planet count")?;
        }
        Ok(config)
    }
}

/// Spins its holder around the local Y axis.
struct Spin {
    animation: Animation,
    speed: f32,
}

impl<T: Transformation> Feature<T> for Spin {}

impl<T> Animable<T> for Spin
where
    T: Transformation + AbstractTranslationRotation<Rotation = Quat>,
{
    fn animation(&self) -> &Animation {
        &self.animation
    }

    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }

    fn animation_step(&mut self, transformation: &mut TransformationMut<'_, T>, _time: f32, delta: f32) {
        transformation.rotate_local(Quat::from_rotation_y(self.speed * delta));
    }

    fn animation_started(&mut self) {
        log::debug!("Spin started at {} rad/s", self.speed);
    }
}

/// Projects its holder's origin and remembers where it landed on screen.
struct Marker {
    name: String,
    position: Vec3,
}

impl Feature<DemoTransformation> for Marker {}

impl Drawable<DemoTransformation> for Marker {
    fn draw(&mut self, transformation_matrix: &Mat4, camera: &Camera<DemoTransformation>) {
        let view = transformation_matrix.transform_point3(Vec3::ZERO);
        self.position = camera.projection_matrix().project_point3(view);
    }
}

pub struct DemoState {
    pub config: DemoConfig,
    pub scene: Scene<DemoTransformation>,
    pub camera: FeatureHandle<DemoTransformation, Camera<DemoTransformation>>,
    pub drawables: DrawableGroup<DemoTransformation>,
    pub animables: AnimableGroup<DemoTransformation>,
    markers: Vec<FeatureHandle<DemoTransformation, Marker>>,
    time: f32,
}

impl DemoState {
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let mut scene = Scene::with_config(&SceneConfig {
            root_name: String::from("Solar system"),
            ..SceneConfig::default()
        });
        let root = scene.root();

        let mut camera = Camera::<DemoTransformation>::new();
        camera
            .set_perspective(60f32.to_radians(), 1.0, 0.1, 100.0)
            .set_aspect_ratio_policy(AspectRatioPolicy::Extend)
            .set_viewport(config.viewport);
        let (camera_object, camera) = scene
            .add_object_with(Some(root), camera, CachedTransformations::INVERTED)
            .context("Failed to create the camera")?;
        scene
            .object_mut(camera_object)?
            .set_name("Camera")
            .translate(Vec3::new(0.0, 8.0, 24.0))
            .rotate_local(Quat::from_rotation_x(-0.3));

        let mut drawables = DrawableGroup::new();
        let mut animables = AnimableGroup::new();
        let mut markers = Vec::new();

        let sun = add_body(&mut scene, root, "Sun", 0.2, &mut drawables, &mut animables, &mut markers)?;
        for index in 0..config.planets {
            let orbit = add_body(
                &mut scene,
                sun,
                &format!("Orbit {index}"),
                1.0 / (index as f32 + 1.0),
                &mut drawables,
                &mut animables,
                &mut markers,
            )?;
            let planet = scene.add_named_object(format!("Planet {index}"), Some(orbit))?;
            scene
                .object_mut(planet)?
                .translate(Vec3::X * config.orbit_spacing * (index as f32 + 1.0));
            let marker = scene.attach(
                planet,
                Marker {
                    name: format!("Planet {index}"),
                    position: Vec3::ZERO,
                },
                CachedTransformations::empty(),
            )?;
            drawables.add(&marker);
            markers.push(marker);
        }

        log::info!(
            "Built scene with {} objects, {} drawables, {} animables",
            scene.len(),
            drawables.len(),
            animables.len()
        );

        Ok(Self {
            config,
            scene,
            camera,
            drawables,
            animables,
            markers,
            time: 0.0,
        })
    }

    pub fn update(&mut self) -> anyhow::Result<()> {
        self.time += self.config.frame_time;
        self.animables
            .step(&mut self.scene, self.time, self.config.frame_time);
        self.scene
            .draw(&self.camera, &self.drawables)
            .context("Failed to draw the scene")?;
        Ok(())
    }

    pub fn report(&self) {
        for marker in &self.markers {
            marker.with(|marker| log::info!("{} at {:.3}", marker.name, marker.position));
        }
    }
}

fn add_body(
    scene: &mut Scene<DemoTransformation>,
    parent: ObjectId<DemoTransformation>,
    name: &str,
    speed: f32,
    drawables: &mut DrawableGroup<DemoTransformation>,
    animables: &mut AnimableGroup<DemoTransformation>,
    markers: &mut Vec<FeatureHandle<DemoTransformation, Marker>>,
) -> anyhow::Result<ObjectId<DemoTransformation>> {
    let mut animation = Animation::new(0.0);
    animation.start();
    let (object, spin) = scene.add_object_with(
        Some(parent),
        Spin { animation, speed },
        CachedTransformations::empty(),
    )?;
    scene.object_mut(object)?.set_name(name);
    animables.add(&spin);

    let marker = scene.attach(
        object,
        Marker {
            name: name.to_owned(),
            position: Vec3::ZERO,
        },
        CachedTransformations::empty(),
    )?;
    drawables.add(&marker);
    markers.push(marker);

    Ok(object)
}
