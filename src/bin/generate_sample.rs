use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn bernoulli(&mut self, p: f64) -> i64 {
        i64::from(self.next_f64() < p)
    }

    /// Ordinal level 1..=3 with the given probabilities for 2 and 3.
    fn level(&mut self, p2: f64, p3: f64) -> i64 {
        let u = self.next_f64();
        if u < p3 {
            3
        } else if u < p3 + p2 {
            2
        } else {
            1
        }
    }
}

#[derive(Serialize)]
struct Row {
    id: i64,
    age: i64,
    gender: i64,
    height: i64,
    weight: f64,
    ap_hi: i64,
    ap_lo: i64,
    cholesterol: i64,
    gluc: i64,
    smoke: i64,
    alco: i64,
    active: i64,
    cardio: i64,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_patients = 2000;

    let output_path = "medical_examination.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    for id in 0..n_patients {
        let gender = 1 + rng.bernoulli(0.35);
        let height_mean = if gender == 2 { 170.0 } else { 161.0 };
        let height = rng.gauss(height_mean, 7.5).round().max(120.0);
        let weight = (rng.gauss(74.0, 14.0).max(35.0) * 10.0).round() / 10.0;
        let age_years = rng.gauss(53.0, 6.8).clamp(30.0, 65.0);

        let mut ap_hi = rng.gauss(126.0 + (age_years - 53.0) * 0.6, 16.0).round();
        let mut ap_lo = rng.gauss(81.0, 9.0).round();
        // A few transposed readings, as found in real exam sheets.
        if rng.next_f64() < 0.02 {
            std::mem::swap(&mut ap_hi, &mut ap_lo);
        }

        let bmi = weight / (height / 100.0).powi(2);
        let risk = -9.0 + 0.05 * age_years + 0.03 * ap_hi + 0.04 * bmi;
        let p_cardio = 1.0 / (1.0 + (-risk).exp());

        let row = Row {
            id,
            age: (age_years * 365.25).round() as i64,
            gender,
            height: height as i64,
            weight,
            ap_hi: ap_hi as i64,
            ap_lo: ap_lo as i64,
            cholesterol: rng.level(0.14, 0.11),
            gluc: rng.level(0.07, 0.08),
            smoke: rng.bernoulli(0.09),
            alco: rng.bernoulli(0.05),
            active: rng.bernoulli(0.80),
            cardio: rng.bernoulli(p_cardio),
        };
        writer.serialize(&row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_patients} patients to {output_path}");
}
