//! Mesh data structures and generation

use crate::backend::traits::*;
use crate::backend::types::*;
use glam::{Vec2, Vec3};

/// A mesh with vertex and index data
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub name: String,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: name.to_string(),
        }
    }

    /// Calculate vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Calculate index count
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Calculate triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex data as bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Create a latitude/longitude sphere centered at origin.
    ///
    /// `tessellation` is the number of latitude bands; twice as many longitude
    /// segments are generated. Each ring repeats its first vertex so the seam
    /// gets its own UVs, giving `(t + 1) * (2t + 1)` vertices. Triangles are
    /// counter-clockwise when seen from outside.
    pub fn sphere(radius: f32, tessellation: u32) -> Self {
        let mut mesh = Mesh::new("sphere");

        let vertical = tessellation;
        let horizontal = tessellation * 2;

        for i in 0..=vertical {
            let v = 1.0 - i as f32 / vertical as f32;
            let latitude = i as f32 * std::f32::consts::PI / vertical as f32 - std::f32::consts::FRAC_PI_2;
            let (dy, dxz) = latitude.sin_cos();

            for j in 0..=horizontal {
                let u = j as f32 / horizontal as f32;
                let longitude = j as f32 * std::f32::consts::TAU / horizontal as f32;
                let (sin_lon, cos_lon) = longitude.sin_cos();

                let normal = Vec3::new(sin_lon * dxz, dy, cos_lon * dxz);
                mesh.vertices.push(Vertex {
                    position: normal * radius,
                    normal,
                    uv: Vec2::new(u, v),
                });
            }
        }

        let stride = horizontal + 1;
        for i in 0..vertical {
            for j in 0..horizontal {
                let current = i * stride + j;
                let above = current + stride;

                mesh.indices.extend_from_slice(&[
                    current,
                    current + 1,
                    above,
                    current + 1,
                    above + 1,
                    above,
                ]);
            }
        }

        mesh
    }
}

/// GPU resources for a mesh
pub struct GpuMesh {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload vertex and index data
    pub fn create<B: GraphicsBackend>(backend: &mut B, mesh: &Mesh) -> BackendResult<Self> {
        let vertex_data = mesh.vertex_bytes();
        let index_data = mesh.index_bytes();

        let vertex_buffer = backend.create_buffer_init(
            &BufferDescriptor {
                label: Some(format!("{} Vertex Buffer", mesh.name)),
                size: vertex_data.len() as u64,
                usage: BufferUsage::VERTEX,
            },
            vertex_data,
        )?;

        let index_buffer = backend.create_buffer_init(
            &BufferDescriptor {
                label: Some(format!("{} Index Buffer", mesh.name)),
                size: index_data.len() as u64,
                usage: BufferUsage::INDEX,
            },
            index_data,
        )?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        })
    }

    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_buffer(self.vertex_buffer);
        backend.destroy_buffer(self.index_buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3)]
    #[case(6)]
    #[case(16)]
    fn test_sphere_counts(#[case] tessellation: u32) {
        let mesh = Mesh::sphere(2.0, tessellation);
        let t = tessellation as usize;
        assert_eq!(mesh.vertex_count(), (t + 1) * (2 * t + 1));
        assert_eq!(mesh.index_count(), t * 2 * t * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = Mesh::sphere(2.0, 6);
        for vertex in &mesh.vertices {
            assert!((vertex.position.length() - 2.0).abs() < 1e-5);
            assert!((vertex.normal.length() - 1.0).abs() < 1e-5);
            assert!(vertex.normal.dot(vertex.position) > 0.0);
        }
    }

    #[test]
    fn test_sphere_triangles_face_outward() {
        let mesh = Mesh::sphere(1.0, 6);
        for tri in mesh.indices.chunks_exact(3) {
            let a = mesh.vertices[tri[0] as usize].position;
            let b = mesh.vertices[tri[1] as usize].position;
            let c = mesh.vertices[tri[2] as usize].position;
            let normal = (b - a).cross(c - a);
            // Pole triangles collapse to a line
            if normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_mesh_bytes_match_vertex_layout() {
        let mesh = Mesh::sphere(2.0, 6);
        let stride = Vertex::layout().stride as usize;
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertex_count() * stride);
        assert_eq!(mesh.index_bytes().len(), mesh.index_count() * 4);
    }
}
