use std::cell::RefCell;
use std::rc::Weak;

use itertools::Itertools;

use crate::scene_graph::feature::{Feature, FeatureHandle, FeatureId};
use crate::scene_graph::group::FeatureGroup;
use crate::scene_graph::object::TransformationMut;
use crate::scene_graph::scene::Scene;
use crate::transformation::Transformation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Stopped,
    Paused,
    Running,
}

/// Playback state of one animable.
///
/// State changes requested through [`set_state`](Self::set_state) take
/// effect on the next [`AnimableGroup::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    duration: f32,
    repeated: bool,
    repeat_count: u32,
    state: AnimationState,
    previous_state: AnimationState,
    start_time: f32,
    pause_time: f32,
    repeats: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Animation {
    /// `duration` of zero means the animation never ends on its own.
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            repeated: false,
            repeat_count: 0,
            state: AnimationState::Stopped,
            previous_state: AnimationState::Stopped,
            start_time: 0.0,
            pause_time: 0.0,
            repeats: 0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f32) -> &mut Self {
        self.duration = duration;
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    pub fn set_repeated(&mut self, repeated: bool) -> &mut Self {
        self.repeated = repeated;
        self
    }

    /// Zero means repeating forever.
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn set_repeat_count(&mut self, count: u32) -> &mut Self {
        self.repeat_count = count;
        self
    }

    /// Number of completed repeats since the animation was last started.
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Requests a state change. Pausing a stopped animation is ignored.
    pub fn set_state(&mut self, state: AnimationState) -> &mut Self {
        if self.state == AnimationState::Stopped && state == AnimationState::Paused {
            log::warn!("Ignoring request to pause a stopped animation");
            return self;
        }
        self.state = state;
        self
    }

    pub fn start(&mut self) -> &mut Self {
        self.set_state(AnimationState::Running)
    }

    pub fn pause(&mut self) -> &mut Self {
        self.set_state(AnimationState::Paused)
    }

    pub fn stop(&mut self) -> &mut Self {
        self.set_state(AnimationState::Stopped)
    }

    pub fn is_running(&self) -> bool {
        self.previous_state == AnimationState::Running
    }
}

/// A feature stepped in time by an [`AnimableGroup`].
///
/// Implementations move their holder through the [`TransformationMut`] they
/// receive, usually through the narrowest capability trait they need:
///
/// ```ignore
/// impl<T> Animable<T> for Spin
/// where
///     T: Transformation + AbstractTranslationRotation<Rotation = f32>,
/// { ... }
/// ```
pub trait Animable<T: Transformation>: Feature<T> {
    fn animation(&self) -> &Animation;

    fn animation_mut(&mut self) -> &mut Animation;

    /// `time` is measured from the start of the current repeat.
    fn animation_step(&mut self, transformation: &mut TransformationMut<'_, T>, time: f32, delta: f32);

    fn animation_started(&mut self) {}

    fn animation_paused(&mut self) {}

    fn animation_resumed(&mut self) {}

    fn animation_stopped(&mut self) {}
}

impl<T: Transformation> FeatureGroup<T, dyn Animable<T>> {
    pub fn add<F: Animable<T>>(&mut self, animable: &FeatureHandle<T, F>) -> bool {
        let weak: Weak<RefCell<dyn Animable<T>>> = animable.cell.clone();
        self.add_weak(animable.id, weak)
    }
}

/// Group driving a set of animables.
#[derive(Debug)]
pub struct AnimableGroup<T: Transformation> {
    animables: FeatureGroup<T, dyn Animable<T>>,
    running_count: usize,
}

impl<T: Transformation> Default for AnimableGroup<T> {
    fn default() -> Self {
        Self {
            animables: FeatureGroup::new(),
            running_count: 0,
        }
    }
}

impl<T: Transformation> AnimableGroup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Animable<T>>(&mut self, animable: &FeatureHandle<T, F>) -> bool {
        self.animables.add(animable)
    }

    pub fn remove(&mut self, feature_id: FeatureId<T>) -> bool {
        self.animables.remove(feature_id)
    }

    pub fn len(&self) -> usize {
        self.animables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animables.is_empty()
    }

    /// Animables that were running after the last step.
    pub fn running_count(&self) -> usize {
        self.running_count
    }

    /// Advances every member to `time`.
    ///
    /// Pending state changes are applied first, firing the matching
    /// callback. Running animables past their duration are repeated or
    /// stopped; the rest get [`Animable::animation_step`]. Holders whose
    /// transformation was touched are marked dirty.
    pub fn step(&mut self, scene: &mut Scene<T>, time: f32, delta: f32) {
        self.animables.prune(scene);
        let members = self.animables.iter(scene).collect_vec();

        let mut running_count = 0;
        for (feature_id, cell) in members {
            let holder = scene.features[feature_id].holder;
            let mut animable = cell.borrow_mut();
            let Some(elapsed) = advance(&mut *animable, time) else {
                continue;
            };
            running_count += 1;

            let touched = if holder == scene.root {
                let mut scratch = scene.objects[holder].transformation.clone();
                let mut transformation = TransformationMut::new(&mut scratch);
                animable.animation_step(&mut transformation, elapsed, delta);
                if transformation.is_touched() {
                    log::warn!("Animable {:?} tried to move the scene root", feature_id);
                }
                false
            } else {
                let mut transformation = TransformationMut::new(&mut scene.objects[holder].transformation);
                animable.animation_step(&mut transformation, elapsed, delta);
                transformation.is_touched()
            };

            drop(animable);
            if touched {
                scene.mark_dirty(holder);
            }
        }
        self.running_count = running_count;
    }
}

/// Applies a pending state change and the duration limit. Returns the time
/// since the start of the current repeat if the animable should be stepped.
fn advance<T: Transformation>(animable: &mut dyn Animable<T>, time: f32) -> Option<f32> {
    let animation = animable.animation_mut();
    match (animation.previous_state, animation.state) {
        (AnimationState::Paused | AnimationState::Running, AnimationState::Stopped) => {
            animation.previous_state = AnimationState::Stopped;
            animable.animation_stopped();
            return None;
        }
        (AnimationState::Running, AnimationState::Paused) => {
            animation.previous_state = AnimationState::Paused;
            animation.pause_time = time;
            animable.animation_paused();
            return None;
        }
        (AnimationState::Stopped, AnimationState::Running) => {
            animation.previous_state = AnimationState::Running;
            animation.start_time = time;
            animation.repeats = 0;
            animable.animation_started();
        }
        (AnimationState::Paused, AnimationState::Running) => {
            animation.previous_state = AnimationState::Running;
            animation.start_time += time - animation.pause_time;
            animable.animation_resumed();
        }
        (_, AnimationState::Running) => {}
        _ => return None,
    }

    let animation = animable.animation_mut();
    if animation.duration > 0.0 && time - animation.start_time > animation.duration {
        if !animation.repeated || animation.repeats + 1 == animation.repeat_count {
            animation.state = AnimationState::Stopped;
            animation.previous_state = AnimationState::Stopped;
            animable.animation_stopped();
            return None;
        }
        animation.repeats += 1;
        animation.start_time += animation.duration;
    }

    Some(time - animable.animation().start_time)
}
