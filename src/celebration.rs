use rand::seq::SliceRandom;
use rand::Rng;
use std::time::SystemTime;

/// Single piece of confetti on the completion screen
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    vel_x: f64,
    vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            // launched upward; gravity brings the burst back down
            vel_y: rng.gen_range(-6.0..-2.0),
            symbol: *['🎈', '🎉', '✨', '⭐', '🎊']
                .choose(&mut rng)
                .unwrap_or(&'🎈'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 9.0 * dt;
        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti burst for a finished run, advanced once per event-loop tick.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<Particle>,
    start_time: SystemTime,
    duration: f64,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            start_time: SystemTime::now(),
            duration: 3.0,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.start_time = SystemTime::now();
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;

        let center_x = self.width / 2.0;
        let base_y = self.height * 0.75;
        for _ in 0..40 {
            let x = center_x + rng.gen_range(-12.0..12.0);
            let y = base_y + rng.gen_range(-2.0..2.0);
            self.particles.push(Particle::new(x, y));
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let elapsed = self.start_time.elapsed().unwrap_or_default().as_secs_f64();
        if elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let dt = 0.1; // one tick
        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            let buffer = 5.0;
            let off_screen = particle.y > height + buffer
                || particle.x < -buffer
                || particle.x > width + buffer;
            alive && !off_screen
        });
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}
