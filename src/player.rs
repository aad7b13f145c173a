use voxgate_geom::Vec3;
use voxgate_runtime::WorldWindow;
use voxgate_world::WorldConfig;

/// Terminal fall speed (units/s).
const MAX_FALL: f32 = 50.0;

/// Player body driven by the per-frame movement step. `pos` is the eye
/// point; the feet sit `height` below it.
#[derive(Debug)]
pub struct Walker {
    pub pos: Vec3,
    pub vel_y: f32,
    pub on_ground: bool,
    pub creative: bool,
    spawn: Vec3,
    height: f32,
    speed: f32,
    jump_speed: f32,
    gravity: f32, // negative
}

impl Walker {
    pub fn new(cfg: &WorldConfig) -> Self {
        let [x, y, z] = cfg.player.spawn;
        let spawn = Vec3::new(x, y, z);
        Self {
            pos: spawn,
            vel_y: 0.0,
            on_ground: false,
            creative: cfg.player.creative,
            spawn,
            height: cfg.player.height,
            speed: cfg.player.walk_speed,
            jump_speed: cfg.player.jump_velocity,
            gravity: cfg.player.gravity,
        }
    }

    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y - self.height
    }

    pub fn jump(&mut self) -> bool {
        if !self.on_ground || self.creative {
            return false;
        }
        self.vel_y = self.jump_speed;
        self.on_ground = false;
        true
    }

    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel_y = 0.0;
        self.on_ground = false;
    }

    /// Advance one frame. `walk` is the horizontal direction (its `y` is
    /// ignored); a zero vector stands still.
    pub fn step(&mut self, window: &WorldWindow, walk: Vec3, dt: f32) {
        let dir = Vec3::new(walk.x, 0.0, walk.z).normalized();
        let target = self.pos + dir * (self.speed * dt);
        if self.creative {
            self.pos = target;
            self.vel_y = 0.0;
            return;
        }

        if dir != Vec3::ZERO
            && !window
                .collision_chunks(target)
                .iter()
                .any(|c| c.side_collision(target))
        {
            self.pos = target;
        }

        self.vel_y = (self.vel_y + self.gravity * dt).max(-MAX_FALL);
        let new_feet = self.feet() + self.vel_y * dt;
        let candidates = window.collision_chunks(self.pos);
        if self.vel_y <= 0.0 {
            let landing = candidates
                .iter()
                .filter_map(|c| c.vertical_collision(self.pos, false))
                .reduce(f32::max);
            match landing {
                Some(ground) if new_feet <= ground => {
                    self.pos.y = ground + self.height;
                    self.vel_y = 0.0;
                    self.on_ground = true;
                }
                _ => {
                    self.pos.y = new_feet + self.height;
                    self.on_ground = false;
                }
            }
        } else {
            let ceiling = candidates
                .iter()
                .filter_map(|c| c.vertical_collision(self.pos, true))
                .reduce(f32::min);
            match ceiling {
                Some(limit) if new_feet > limit => {
                    self.pos.y = limit + self.height;
                    self.vel_y = 0.0;
                }
                _ => self.pos.y = new_feet + self.height,
            }
            self.on_ground = false;
        }
    }
}
