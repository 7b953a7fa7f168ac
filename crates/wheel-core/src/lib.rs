pub mod animation;
pub mod compositor;
pub mod constants;
pub mod debounce;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod palette;
pub mod scene;
pub mod seed;
pub mod state;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static FLOOR_WGSL: &str = include_str!("../shaders/floor.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use animation::{ChainOrder, ChainPhase, SlotFade, Spring, SpringConfig, TransitionChain, WheelAnimator, WheelPose};
pub use compositor::{FramePlan, PassKind, PassTarget, ReflectionCamera, ReflectionSchedule, TargetSizes};
pub use constants::*;
pub use driver::WheelDirector;
pub use error::SeedError;
pub use gesture::{key_command, DeltaMode, DragMapper, KeyCommand, ScrollIntentClassifier, WheelGestureMapper, WheelSample};
pub use layout::{layout, RingConfig, SlotLayout, SlotRenderParams};
pub use crate::palette::Palette;
pub use scene::{Camera, Instance, PickHit, SceneFrame};
pub use seed::WheelSeed;
pub use state::{IndexStep, SubscriberId, WheelSnapshot, WheelState};
