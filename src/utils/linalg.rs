// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

use crate::model::CellParams;

/// Lattice rows for an orthogonal cell: [[a,0,0],[0,b,0],[0,0,c]]
pub fn orthogonal_lattice(params: &CellParams) -> [[f64; 3]; 3] {
  [
    [params.a, 0.0, 0.0],
    [0.0, params.b, 0.0],
    [0.0, 0.0, params.c],
  ]
}

/// Lattice rows for a hexagonal cell with 120° between a and b
///
/// # Formula
/// ```text
/// x = u·a + v·a·cos(120°)
/// y = v·a·sin(120°)
/// z = w·c
/// ```
pub fn hexagonal_lattice(params: &CellParams) -> [[f64; 3]; 3] {
  let gamma = 120.0f64.to_radians();
  [
    [params.a, 0.0, 0.0],
    [params.a * gamma.cos(), params.a * gamma.sin(), 0.0],
    [0.0, 0.0, params.c],
  ]
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Arguments
/// * `frac` - Fractional coordinates [u, v, w]
/// * `lattice` - Lattice vectors as row matrix [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let frac_vec = Vector3::from(frac);
  let lat_mat = Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ]);

  let cart_vec = lat_mat.transpose() * frac_vec;

  [cart_vec.x, cart_vec.y, cart_vec.z]
}
