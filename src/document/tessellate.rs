// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Body tessellation for STL output

use crate::export::MeshRefinement;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use stl_io::{Normal, Triangle, Vertex};

/// Evaluated body geometry, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solid {
    Box { width: f64, depth: f64, height: f64 },
    Cylinder { radius: f64, height: f64 },
}

/// Segments around a cylinder for each refinement level
pub fn segments(refinement: MeshRefinement) -> u32 {
    match refinement {
        MeshRefinement::High => 64,
        MeshRefinement::Medium => 32,
        MeshRefinement::Low => 16,
    }
}

impl Solid {
    pub fn to_triangles(&self, refinement: MeshRefinement) -> Vec<Triangle> {
        match *self {
            Self::Box {
                width,
                depth,
                height,
            } => box_triangles(Vector3::new(width, depth, height)),
            Self::Cylinder { radius, height } => {
                cylinder_triangles(radius, height, segments(refinement))
            }
        }
    }
}

fn triangle(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Triangle {
    let normal = (b - a).cross(&(c - a));
    let normal = if normal.norm() > 0.0 {
        normal.normalize()
    } else {
        normal
    };

    let vertex = |p: Point3<f64>| Vertex::new([p.x as f32, p.y as f32, p.z as f32]);
    Triangle {
        normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
        vertices: [vertex(a), vertex(b), vertex(c)],
    }
}

fn box_triangles(size: Vector3<f64>) -> Vec<Triangle> {
    let positions = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(size.x, 0.0, 0.0),
        Point3::new(size.x, size.y, 0.0),
        Point3::new(0.0, size.y, 0.0),
        Point3::new(0.0, 0.0, size.z),
        Point3::new(size.x, 0.0, size.z),
        Point3::new(size.x, size.y, size.z),
        Point3::new(0.0, size.y, size.z),
    ];

    // Counter-clockwise seen from outside
    let faces: [[usize; 3]; 12] = [
        [4, 5, 6],
        [4, 6, 7],
        [1, 0, 3],
        [1, 3, 2],
        [5, 1, 2],
        [5, 2, 6],
        [0, 4, 7],
        [0, 7, 3],
        [7, 6, 2],
        [7, 2, 3],
        [0, 1, 5],
        [0, 5, 4],
    ];

    faces
        .iter()
        .map(|f| triangle(positions[f[0]], positions[f[1]], positions[f[2]]))
        .collect()
}

fn cylinder_triangles(radius: f64, height: f64, segments: u32) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(segments as usize * 4);
    let bottom_center = Point3::new(0.0, 0.0, 0.0);
    let top_center = Point3::new(0.0, 0.0, height);

    let ring = |i: u32, z: f64| {
        let angle = 2.0 * PI * (i % segments) as f64 / segments as f64;
        Point3::new(radius * angle.cos(), radius * angle.sin(), z)
    };

    for i in 0..segments {
        let b0 = ring(i, 0.0);
        let b1 = ring(i + 1, 0.0);
        let t0 = ring(i, height);
        let t1 = ring(i + 1, height);

        triangles.push(triangle(bottom_center, b1, b0));
        triangles.push(triangle(top_center, t0, t1));
        triangles.push(triangle(b0, b1, t1));
        triangles.push(triangle(b0, t1, t0));
    }

    triangles
}
