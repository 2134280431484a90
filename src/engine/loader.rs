// Walkmesh blob I/O.
//
// The on-disk format is a sequence of tagged chunks, in fixed order:
//   [4-byte ASCII tag][u64 little-endian payload byte length][payload]
//   tri0: triangle index triples, 3 x u32 each
//   vrt0: vertex positions, 3 x f32 each
//   nrm0: vertex normals, 3 x f32 each, parallel to vrt0
// A tag mismatch, a short read, or a payload that is not a whole number
// of elements is a load error, never a silent skip. Payload scalars are
// little-endian, which is every platform this targets, so elements are
// memcpy-cast with bytemuck.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use glam::Vec3;

use super::error::{WalkError, WalkResult};
use super::walkmesh::WalkMesh;

pub const TRIANGLE_TAG: [u8; 4] = *b"tri0";
pub const POSITION_TAG: [u8; 4] = *b"vrt0";
pub const NORMAL_TAG: [u8; 4] = *b"nrm0";

/// On-disk triangle record: three vertex indices.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct RawTriangle {
    a: u32,
    b: u32,
    c: u32,
}

/// On-disk vector record: a position or a normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct RawVec3 {
    x: f32,
    y: f32,
    z: f32,
}

// ============================================================================
// READING
// ============================================================================

/// Read one chunk, checking the tag and that the payload is a whole
/// number of `elem_size`-byte elements.
fn read_chunk(reader: &mut impl Read, expected: [u8; 4], elem_size: usize) -> WalkResult<Vec<u8>> {
    let mut tag = [0u8; 4];
    reader.read_exact(&mut tag)?;
    if tag != expected {
        return Err(WalkError::ChunkTag {
            expected: String::from_utf8_lossy(&expected).into_owned(),
            found: String::from_utf8_lossy(&tag).into_owned(),
        });
    }

    let mut len_bytes = [0u8; 8];
    reader.read_exact(&mut len_bytes)?;
    let len = u64::from_le_bytes(len_bytes);
    if len % elem_size as u64 != 0 {
        return Err(WalkError::ChunkSize {
            tag: String::from_utf8_lossy(&expected).into_owned(),
            len,
            elem_size,
        });
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

fn parse_triangles(payload: &[u8]) -> Vec<[u32; 3]> {
    payload
        .chunks_exact(size_of::<RawTriangle>())
        .map(|bytes| {
            let raw: RawTriangle = bytemuck::pod_read_unaligned(bytes);
            [raw.a, raw.b, raw.c]
        })
        .collect()
}

fn parse_vectors(payload: &[u8]) -> Vec<Vec3> {
    payload
        .chunks_exact(size_of::<RawVec3>())
        .map(|bytes| {
            let raw: RawVec3 = bytemuck::pod_read_unaligned(bytes);
            Vec3::new(raw.x, raw.y, raw.z)
        })
        .collect()
}

/// Load a walkmesh blob from disk.
///
/// Chunks must appear in tri0, vrt0, nrm0 order; the assembled arrays
/// then go through the full `WalkMesh::new` validation.
pub fn load(path: impl AsRef<Path>) -> WalkResult<WalkMesh> {
    let mut reader = BufReader::new(File::open(path)?);

    let triangles = parse_triangles(&read_chunk(
        &mut reader,
        TRIANGLE_TAG,
        size_of::<RawTriangle>(),
    )?);
    let positions = parse_vectors(&read_chunk(&mut reader, POSITION_TAG, size_of::<RawVec3>())?);
    let normals = parse_vectors(&read_chunk(&mut reader, NORMAL_TAG, size_of::<RawVec3>())?);

    WalkMesh::new(positions, normals, triangles)
}

// ============================================================================
// WRITING
// ============================================================================

fn write_chunk(writer: &mut impl Write, tag: [u8; 4], payload: &[u8]) -> WalkResult<()> {
    writer.write_all(&tag)?;
    writer.write_all(&(payload.len() as u64).to_le_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

/// Write a walkmesh blob, the inverse of `load`. For mesh tooling and
/// tests; the data is written as-is, validation happens on the way back
/// in.
pub fn save(
    path: impl AsRef<Path>,
    positions: &[Vec3],
    normals: &[Vec3],
    triangles: &[[u32; 3]],
) -> WalkResult<()> {
    let raw_triangles: Vec<RawTriangle> = triangles
        .iter()
        .map(|&[a, b, c]| RawTriangle { a, b, c })
        .collect();
    let raw_positions: Vec<RawVec3> = positions
        .iter()
        .map(|v| RawVec3 {
            x: v.x,
            y: v.y,
            z: v.z,
        })
        .collect();
    let raw_normals: Vec<RawVec3> = normals
        .iter()
        .map(|v| RawVec3 {
            x: v.x,
            y: v.y,
            z: v.z,
        })
        .collect();

    let mut writer = BufWriter::new(File::create(path)?);
    write_chunk(&mut writer, TRIANGLE_TAG, bytemuck::cast_slice(&raw_triangles))?;
    write_chunk(&mut writer, POSITION_TAG, bytemuck::cast_slice(&raw_positions))?;
    write_chunk(&mut writer, NORMAL_TAG, bytemuck::cast_slice(&raw_normals))?;
    writer.flush()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("walkabout-{}-{name}", std::process::id()))
    }

    fn square_mesh_arrays() -> (Vec<Vec3>, Vec<Vec3>, Vec<[u32; 3]>) {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let normals = vec![Vec3::Z; 4];
        let triangles = vec![[0, 1, 2], [1, 3, 2]];
        (positions, normals, triangles)
    }

    #[test]
    fn blob_round_trip() {
        let path = scratch_path("roundtrip.blob");
        let (positions, normals, triangles) = square_mesh_arrays();

        save(&path, &positions, &normals, &triangles).unwrap();
        let mesh = load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle(1), [1, 3, 2]);

        let wp = mesh.locate(Vec3::new(0.9, 0.9, 2.0));
        assert!((mesh.world_point(&wp) - Vec3::new(0.9, 0.9, 0.0)).length() < 1e-4);
    }

    #[test]
    fn rejects_wrong_tag() {
        let path = scratch_path("wrong-tag.blob");
        {
            let mut writer = BufWriter::new(File::create(&path).unwrap());
            write_chunk(&mut writer, *b"xxx0", &[]).unwrap();
            writer.flush().unwrap();
        }
        let err = load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, WalkError::ChunkTag { .. }));
    }

    #[test]
    fn rejects_ragged_payload_length() {
        let path = scratch_path("ragged.blob");
        {
            // 10 bytes is not a whole number of 12-byte triangles.
            let mut writer = BufWriter::new(File::create(&path).unwrap());
            write_chunk(&mut writer, TRIANGLE_TAG, &[0u8; 10]).unwrap();
            writer.flush().unwrap();
        }
        let err = load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, WalkError::ChunkSize { len: 10, .. }));
    }

    #[test]
    fn rejects_truncated_payload() {
        let path = scratch_path("truncated.blob");
        {
            // Header claims 24 bytes of triangles, file ends after 4.
            let mut file = File::create(&path).unwrap();
            file.write_all(&TRIANGLE_TAG).unwrap();
            file.write_all(&24u64.to_le_bytes()).unwrap();
            file.write_all(&[0u8; 4]).unwrap();
        }
        let err = load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, WalkError::Io(_)));
    }

    #[test]
    fn load_runs_mesh_validation() {
        let path = scratch_path("bad-index.blob");
        let (positions, normals, _) = square_mesh_arrays();
        // Index 9 is out of range for 4 vertices.
        save(&path, &positions, &normals, &[[0, 1, 9]]).unwrap();
        let err = load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, WalkError::IndexOutOfBounds { index: 9, .. }));
    }
}
