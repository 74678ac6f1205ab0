//! Vector and matrix helpers
//!
//! Plain `[f32; 3]` vectors and column-major `[[f32; 4]; 4]` matrices, laid
//! out the way shader uniforms expect them.

/// A 3D vector
pub type Vec3 = [f32; 3];

/// A 4x4 matrix in column-major order (`m[column][row]`)
pub type Mat4 = [[f32; 4]; 4];

/// Vector length below which a direction is considered undefined
const NORMALIZE_EPSILON: f32 = 1e-10;

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// Dot product of two 3D vectors
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product of two 3D vectors
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Unit vector along `v`, or +Z when `v` is too short to have a direction
pub fn normalize(v: Vec3) -> Vec3 {
    match length(v) {
        len if len > NORMALIZE_EPSILON => scale(v, 1.0 / len),
        _ => [0.0, 0.0, 1.0],
    }
}

pub fn identity() -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Translation matrix moving the origin to `t`
pub fn translation(t: Vec3) -> Mat4 {
    let mut m = identity();
    m[3] = [t[0], t[1], t[2], 1.0];
    m
}

/// Matrix product `a × b` (apply `b` first, then `a`)
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, cell) in out_col.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

/// Transform a point (w = 1) by a matrix
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let mut out = [0.0; 3];
    for (row, cell) in out.iter_mut().enumerate() {
        *cell = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

/// Rotation of `angle` radians around `axis` (right-handed)
pub fn rotation(axis: Vec3, angle: f32) -> Mat4 {
    let [x, y, z] = normalize(axis);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    [
        [x * x * t + c, y * x * t + z * s, z * x * t - y * s, 0.0],
        [x * y * t - z * s, y * y * t + c, z * y * t + x * s, 0.0],
        [x * z * t + y * s, y * z * t - x * s, z * z * t + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// View matrix for a camera at `eye` facing `target`.
///
/// Right-handed: the camera looks down its local -Z axis.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = normalize(sub(target, eye));
    let side = normalize(cross(forward, up));
    let upward = cross(side, forward);

    [
        [side[0], upward[0], -forward[0], 0.0],
        [side[1], upward[1], -forward[1], 0.0],
        [side[2], upward[2], -forward[2], 0.0],
        [-dot(side, eye), -dot(upward, eye), dot(forward, eye), 1.0],
    ]
}

/// Perspective projection mapping depth `[near, far]` onto clip `[-1, 1]`.
///
/// `fov` is the vertical field of view in radians.
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let focal = 1.0 / (fov * 0.5).tan();
    let depth = far - near;

    [
        [focal / aspect, 0.0, 0.0, 0.0],
        [0.0, focal, 0.0, 0.0],
        [0.0, 0.0, -(far + near) / depth, -1.0],
        [0.0, 0.0, -2.0 * far * near / depth, 0.0],
    ]
}
