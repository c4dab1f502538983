use bytemuck::{Pod, Zeroable};

/// Vertex of the aurora plane: object-space position and texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl PlaneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Subdivided rectangle in the XY plane, centred on the origin and facing +Z.
#[derive(Debug, Clone)]
pub struct PlaneMesh {
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u32>,
}

impl PlaneMesh {
    pub const AURORA_WIDTH: f32 = 100.0;
    pub const AURORA_HEIGHT: f32 = 7.5;
    pub const AURORA_SEGMENTS: (u32, u32) = (128, 64);

    /// The wide, shallow band the aurora curtain is drawn on.
    pub fn aurora() -> Self {
        let (columns, rows) = Self::AURORA_SEGMENTS;
        Self::new(Self::AURORA_WIDTH, Self::AURORA_HEIGHT, columns, rows)
    }

    /// Builds a grid of `columns x rows` quads. Rows run top to bottom, `v` is 1 on
    /// the top edge, and each quad is split into two counter-clockwise triangles.
    pub fn new(width: f32, height: f32, columns: u32, rows: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let stride = columns + 1;
        let cell_width = width / columns as f32;
        let cell_height = height / rows as f32;

        let mut vertices = Vec::with_capacity((stride * (rows + 1)) as usize);
        for row in 0..=rows {
            let y = row as f32 * cell_height - height / 2.0;
            for column in 0..=columns {
                let x = column as f32 * cell_width - width / 2.0;
                vertices.push(PlaneVertex {
                    position: [x, -y, 0.0],
                    uv: [
                        column as f32 / columns as f32,
                        1.0 - row as f32 / rows as f32,
                    ],
                });
            }
        }

        let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let a = column + stride * row;
                let b = column + stride * (row + 1);
                let c = column + 1 + stride * (row + 1);
                let d = column + 1 + stride * row;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
