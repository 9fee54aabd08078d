//! Coordinate algebra: unit vectors, lat/long, and the lazy [`Coordinate`]
//! value that defers conversion between them until it's actually needed.
//!
//! Convention: looking at a planet with the north pole upwards and the
//! geographic origin in the middle, the vector space is right-handed with
//! Y pointing north, X pointing east and Z pointing outwards:
//! `(0, 0, 1)` is 0°N 0°E, `(0, 1, 0)` is the north pole (longitude
//! undefined, reported as 0°), `(1, 0, 0)` is 0°N 90°E.

use std::ops::{Add, Mul, Neg, Sub};

pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// A 3D direction vector. Not required to be normalized except where the
/// API documents it (sources are always called with unit vectors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector { x, y, z }
    }

    pub const X: Vector = Vector::new(1.0, 0.0, 0.0);
    pub const Y: Vector = Vector::new(0.0, 1.0, 0.0);
    pub const Z: Vector = Vector::new(0.0, 0.0, 1.0);

    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    pub fn normalized(&self) -> Vector {
        let len = self.length();
        if len > 0.0 { *self * (1.0 / len) } else { *self }
    }

    pub fn dot(&self, other: Vector) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vector) -> Vector {
        Vector::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;
    fn mul(self, k: f32) -> Vector {
        Vector::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

/// `Vector(sin(lon)*cos(lat), sin(lat), cos(lon)*cos(lat))`.
pub fn vector_from_latlong_rad(lat: f32, lon: f32) -> Vector {
    Vector::new(lon.sin() * lat.cos(), lat.sin(), lon.cos() * lat.cos())
}

pub fn vector_from_latlong_deg(lat: f32, lon: f32) -> Vector {
    vector_from_latlong_rad(lat * DEG_TO_RAD, lon * DEG_TO_RAD)
}

/// Inverse of [`vector_from_latlong_rad`]. `v` is normalized first; at the
/// poles (`|v.y| == 1`) longitude is arbitrarily but consistently defined
/// as 0.
pub fn vector_to_latlong_rad(v: Vector) -> (f32, f32) {
    let v = v.normalized();
    let lat = v.y.clamp(-1.0, 1.0).asin();

    if v.y.abs() >= 1.0 {
        return (lat, 0.0);
    }

    let cos_lat = lat.cos();
    let mut lon = (v.x / cos_lat).clamp(-1.0, 1.0).asin();

    if v.z < 0.0 {
        lon = if v.x < 0.0 {
            -std::f32::consts::PI - lon
        } else {
            std::f32::consts::PI - lon
        };
    }

    (lat, lon)
}

pub fn vector_to_latlong_deg(v: Vector) -> (f32, f32) {
    let (lat, lon) = vector_to_latlong_rad(v);
    (lat * RAD_TO_DEG, lon * RAD_TO_DEG)
}

/// A direction on the unit sphere, carried in whichever form the producer
/// had on hand. Conversion between vector and lat/long representations is
/// deferred until a consumer actually asks for the other form, so a sink
/// and source that agree on representation never pay for trig calls.
#[derive(Debug, Clone, Copy)]
pub enum Coordinate {
    Vector(Vector),
    LatLongRad(f32, f32),
    LatLongDeg(f32, f32),
}

impl Coordinate {
    pub fn from_vector(v: Vector) -> Self {
        Coordinate::Vector(v)
    }

    pub fn from_latlong_rad(lat: f32, lon: f32) -> Self {
        Coordinate::LatLongRad(lat, lon)
    }

    pub fn from_latlong_deg(lat: f32, lon: f32) -> Self {
        Coordinate::LatLongDeg(lat, lon)
    }

    pub fn as_vector(&self) -> Vector {
        match *self {
            Coordinate::Vector(v) => v,
            Coordinate::LatLongRad(lat, lon) => vector_from_latlong_rad(lat, lon),
            Coordinate::LatLongDeg(lat, lon) => vector_from_latlong_deg(lat, lon),
        }
    }

    pub fn as_latlong_rad(&self) -> (f32, f32) {
        match *self {
            Coordinate::LatLongRad(lat, lon) => (lat, lon),
            Coordinate::LatLongDeg(lat, lon) => (lat * DEG_TO_RAD, lon * DEG_TO_RAD),
            Coordinate::Vector(v) => vector_to_latlong_rad(v),
        }
    }

    pub fn as_latlong_deg(&self) -> (f32, f32) {
        match *self {
            Coordinate::LatLongDeg(lat, lon) => (lat, lon),
            Coordinate::LatLongRad(lat, lon) => (lat * RAD_TO_DEG, lon * RAD_TO_DEG),
            Coordinate::Vector(v) => vector_to_latlong_deg(v),
        }
    }
}
