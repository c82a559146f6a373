use std::io::{self, Write};

use landmap::LandMap;

use crate::render::brightness;

// Vertical exaggeration divisor applied on top of `height`
const HEIGHT_DIVISOR: f32 = 3.0;

/// Regular-grid triangle mesh. Vertex `(i, j)` lives at index `half * i + j`
/// and sits at `(i, height, j)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<u32>,
}

impl TerrainMesh {
    /// Samples `ceil(mesh_size / 2)` vertices per side evenly across the
    /// grid. Heights are `brightness * height / 3`.
    pub fn build(map: &LandMap, mesh_size: usize, height: f32, reference: f32) -> Self {
        let half = mesh_size.div_ceil(2).max(2);
        let max = map.max_index() as f32;
        let step = max / (half - 1) as f32;

        let mut vertices = Vec::with_capacity(half * half);
        let mut triangles = Vec::with_capacity((half - 1) * (half - 1) * 6);

        for i in 0..half {
            for j in 0..half {
                let gx = (i as f32 * step).round() as isize;
                let gy = (j as f32 * step).round() as isize;
                let h = brightness(map.height(gx, gy), reference) * height / HEIGHT_DIVISOR;
                vertices.push([i as f32, h, j as f32]);

                if i == 0 || j == 0 {
                    continue;
                }
                let add = (half * i + j) as u32;
                let sub = (half * (i - 1) + j) as u32;
                triangles.extend_from_slice(&[add, add - 1, sub - 1, sub - 1, sub, add]);
            }
        }

        let uvs = vertices.iter().map(|v| [v[0], v[2]]).collect();
        Self {
            vertices,
            uvs,
            triangles,
        }
    }

    /// Writes the mesh as Wavefront OBJ (1-based indices).
    pub fn write_obj<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "o LandMap")?;
        for [x, y, z] in &self.vertices {
            writeln!(out, "v {x} {y} {z}")?;
        }
        for [u, v] in &self.uvs {
            writeln!(out, "vt {u} {v}")?;
        }
        for tri in self.triangles.chunks_exact(3) {
            let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
            writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
        }
        Ok(())
    }
}
