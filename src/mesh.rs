use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position: position.to_array(), normal: normal.to_array(), uv: uv.to_array() }
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub bounds: MeshBounds,
}

#[derive(Clone, Debug)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub radius: f32,
}

impl MeshBounds {
    pub fn from_vertices(vertices: &[MeshVertex]) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for vertex in vertices {
            let p = Vec3::from_array(vertex.position);
            min = min.min(p);
            max = max.max(p);
        }
        if vertices.is_empty() {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        let center = (min + max) * 0.5;
        let radius = (max - center).length();
        Self { min, max, center, radius }
    }
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let bounds = MeshBounds::from_vertices(&vertices);
        Self { vertices, indices, bounds }
    }

    pub fn cube(size: f32) -> Self {
        let hs = size * 0.5;
        let positions = [
            Vec3::new(-hs, -hs, -hs),
            Vec3::new(hs, -hs, -hs),
            Vec3::new(hs, hs, -hs),
            Vec3::new(-hs, hs, -hs),
            Vec3::new(-hs, -hs, hs),
            Vec3::new(hs, -hs, hs),
            Vec3::new(hs, hs, hs),
            Vec3::new(-hs, hs, hs),
        ];
        let normals = [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ];

        let uv_quad = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
        let mut vertices = Vec::with_capacity(24);
        let mut write_face = |face: [usize; 4], normal: Vec3| {
            for (i, &index) in face.iter().enumerate() {
                vertices.push(MeshVertex::new(positions[index], normal, uv_quad[i]));
            }
        };

        write_face([0, 3, 2, 1], normals[0]); // back
        write_face([4, 5, 6, 7], normals[1]); // front
        write_face([0, 4, 7, 3], normals[2]); // left
        write_face([1, 2, 6, 5], normals[3]); // right
        write_face([3, 7, 6, 2], normals[4]); // top
        write_face([0, 1, 5, 4], normals[5]); // bottom

        let mut indices = Vec::with_capacity(36);
        for face in 0..6u32 {
            let base = face * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices)
    }

    /// UV sphere. The editor's shape table uses radius 0.5 with a 16x8 grid.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let polar = v * std::f32::consts::PI;
            let (sin_polar, cos_polar) = polar.sin_cos();
            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let azimuth = u * std::f32::consts::TAU;
                let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
                let normal = Vec3::new(sin_polar * cos_azimuth, cos_polar, sin_polar * sin_azimuth);
                vertices.push(MeshVertex::new(normal * radius, normal, Vec2::new(u, v)));
            }
        }
        let stride = segments + 1;
        let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
        Self::new(vertices, indices)
    }

    /// Capped cylinder along Y. The editor's shape table uses radius 0.5,
    /// height 1.0, 16 segments.
    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let hh = height * 0.5;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let azimuth = u * std::f32::consts::TAU;
            let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
            let normal = Vec3::new(cos_azimuth, 0.0, sin_azimuth);
            let rim = Vec3::new(cos_azimuth * radius, 0.0, sin_azimuth * radius);
            vertices.push(MeshVertex::new(rim + Vec3::Y * hh, normal, Vec2::new(u, 0.0)));
            vertices.push(MeshVertex::new(rim - Vec3::Y * hh, normal, Vec2::new(u, 1.0)));
        }
        for segment in 0..segments {
            let base = segment * 2;
            indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
        }

        for (cap_y, cap_normal) in [(hh, Vec3::Y), (-hh, -Vec3::Y)] {
            let center = vertices.len() as u32;
            vertices.push(MeshVertex::new(Vec3::new(0.0, cap_y, 0.0), cap_normal, Vec2::splat(0.5)));
            for segment in 0..=segments {
                let azimuth = segment as f32 / segments as f32 * std::f32::consts::TAU;
                let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
                vertices.push(MeshVertex::new(
                    Vec3::new(cos_azimuth * radius, cap_y, sin_azimuth * radius),
                    cap_normal,
                    Vec2::new(cos_azimuth * 0.5 + 0.5, sin_azimuth * 0.5 + 0.5),
                ));
            }
            for segment in 0..segments {
                let a = center + 1 + segment;
                let b = center + 2 + segment;
                if cap_normal.y > 0.0 {
                    indices.extend_from_slice(&[center, b, a]);
                } else {
                    indices.extend_from_slice(&[center, a, b]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    /// Regular tetrahedron. The editor's shape table uses radius 0.5.
    pub fn pyramid(radius: f32) -> Self {
        let corners = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ]
        .map(|corner| corner.normalize() * radius);
        let faces = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
        let uv_tri = [Vec2::new(0.5, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)];

        let mut vertices = Vec::with_capacity(12);
        let mut indices = Vec::with_capacity(12);
        for face in faces {
            let [a, b, c] = face.map(|index| corners[index]);
            let normal = (b - a).cross(c - a).normalize();
            let base = vertices.len() as u32;
            vertices.push(MeshVertex::new(a, normal, uv_tri[0]));
            vertices.push(MeshVertex::new(b, normal, uv_tri[1]));
            vertices.push(MeshVertex::new(c, normal, uv_tri[2]));
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
        Self::new(vertices, indices)
    }

    /// Triangular prism along Z.
    pub fn prism(size: f32) -> Self {
        let hs = size * 0.5;
        let top = Vec3::new(0.0, hs, 0.0);
        let left = Vec3::new(-hs, -hs, 0.0);
        let right = Vec3::new(hs, -hs, 0.0);

        let tri = [top, left, right];
        let mut vertices = Vec::with_capacity(18);
        let mut indices = Vec::with_capacity(24);

        for (z_normal, winding) in [(Vec3::Z, [0usize, 2, 1]), (-Vec3::Z, [0, 1, 2])] {
            let base = vertices.len() as u32;
            for &corner in &winding {
                let p = tri[corner] + z_normal * hs;
                vertices.push(MeshVertex::new(p, z_normal, Vec2::new(p.x / size + 0.5, p.y / size + 0.5)));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        let edges = [[top, left], [left, right], [right, top]];
        for [a, b] in edges {
            let normal = (b - a).cross(Vec3::Z).normalize();
            let base = vertices.len() as u32;
            for (corner, uv) in [
                (a + Vec3::Z * hs, Vec2::new(0.0, 0.0)),
                (b + Vec3::Z * hs, Vec2::new(1.0, 0.0)),
                (b - Vec3::Z * hs, Vec2::new(1.0, 1.0)),
                (a - Vec3::Z * hs, Vec2::new(0.0, 1.0)),
            ] {
                vertices.push(MeshVertex::new(corner, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices)
    }

    /// Flat disc used by the start and finish markers; radius 1 so the
    /// node's X/Z scale carries the marker radius directly.
    pub fn marker_disc() -> Self {
        Self::cylinder(1.0, 0.05, 24)
    }

    /// Thin board used by sign nodes.
    pub fn sign_board() -> Self {
        let mut board = Self::cube(1.0);
        for vertex in &mut board.vertices {
            vertex.position[2] *= 0.1;
        }
        board.bounds = MeshBounds::from_vertices(&board.vertices);
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_bounds_are_centered() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.bounds.center, Vec3::ZERO);
        assert_eq!(mesh.bounds.min, Vec3::splat(-1.0));
        assert_eq!(mesh.bounds.max, Vec3::splat(1.0));
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let mesh = Mesh::sphere(0.5, 16, 8);
        for vertex in &mesh.vertices {
            let distance = Vec3::from_array(vertex.position).length();
            assert!((distance - 0.5).abs() < 1e-5, "vertex off the sphere: {distance}");
        }
    }

    #[test]
    fn cylinder_height_matches() {
        let mesh = Mesh::cylinder(0.5, 1.0, 16);
        assert!((mesh.bounds.max.y - 0.5).abs() < 1e-6);
        assert!((mesh.bounds.min.y + 0.5).abs() < 1e-6);
    }
}
