use drape::{Cloth, ClothConfig, GridCoord, NoOpStepObserver, Surface, Vec3};
use wasm_bindgen::prelude::*;

/// Frames longer than this are simulated as this long.
const MAX_DT: f32 = 0.016;

fn to_js(err: drape::ClothError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ---- Curtain Demo ----

#[wasm_bindgen]
pub struct CurtainDemo {
    cloth: Cloth<f32>,
    surface: Surface<f32>,
    dragged: Option<GridCoord>,
}

#[wasm_bindgen]
impl CurtainDemo {
    /// One curtain panel hanging from its top edge, pleated along z.
    #[wasm_bindgen(constructor)]
    pub fn new(
        cols: usize,
        rows: usize,
        width: f32,
        height: f32,
        x_offset: f32,
        fold_depth: f32,
        fold_width: f32,
    ) -> Result<CurtainDemo, JsValue> {
        let config = ClothConfig::new(cols, rows, width, height)
            .with_mass(0.1)
            .with_stiffness(0.01)
            .with_damping(0.08)
            .with_gravity(Vec3::new(0.0, -2.0, 0.0));
        let mut cloth = Cloth::new(config).map_err(to_js)?;
        cloth.pin_top_row();
        cloth.translate(Vec3::new(x_offset, height / 2.0, 0.0));
        if fold_depth != 0.0 {
            cloth.apply_pleats(fold_depth, fold_width).map_err(to_js)?;
        }
        let surface = cloth.export_surface();
        Ok(CurtainDemo { cloth, surface, dragged: None })
    }

    pub fn update(&mut self, dt: f32) -> Result<(), JsValue> {
        self.cloth.step(dt.min(MAX_DT), &mut NoOpStepObserver).map_err(to_js)?;
        self.cloth.refresh_surface(&mut self.surface).map_err(to_js)
    }

    /// Slide the panel `offset` along x from rest with a wave running down it.
    ///
    /// Only x is driven; y and z keep their simulated sag and drags.
    pub fn slide(&mut self, offset: f32, time: f32, flow_amount: f32, flow_speed: f32) -> Result<(), JsValue> {
        let rows = self.cloth.rows() as f32;
        self.cloth.drive_x_from_rest(|coord| {
            let along = coord.row as f32 / rows;
            let wave = (time * flow_speed + along * core::f32::consts::PI).sin() * flow_amount;
            offset + wave
        });
        self.cloth.refresh_surface(&mut self.surface).map_err(to_js)
    }

    /// Grab the particle nearest to a ray hit on the panel.
    pub fn drag_start(&mut self, x: f32, y: f32, z: f32) {
        self.dragged = Some(self.cloth.nearest_particle(Vec3::new(x, y, z)));
    }

    pub fn drag_move(&mut self, x: f32, y: f32, z: f32) -> Result<bool, JsValue> {
        match self.dragged {
            Some(coord) => self
                .cloth
                .drag_particle(coord.col, coord.row, Vec3::new(x, y, z))
                .map_err(to_js),
            None => Ok(false),
        }
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
    }

    pub fn set_stiffness(&mut self, stiffness: f32) -> Result<(), JsValue> {
        self.cloth.set_stiffness(stiffness).map_err(to_js)
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), JsValue> {
        self.cloth.set_damping(damping).map_err(to_js)
    }

    /// Flat [x0, y0, z0, x1, ...] in row-major order.
    pub fn positions(&self) -> Vec<f32> {
        self.surface.positions().to_vec()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.surface.normals().to_vec()
    }

    pub fn uvs(&self) -> Vec<f32> {
        self.surface.uvs().to_vec()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.surface.indices().to_vec()
    }

    pub fn revision(&self) -> u64 {
        self.surface.revision()
    }

    pub fn cols(&self) -> usize {
        self.cloth.cols()
    }

    pub fn rows(&self) -> usize {
        self.cloth.rows()
    }
}
