// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

/// Zig-zag varint encoding of `value` into `buf`, returning the encoded length.
///
/// Non-negative values map to even unsigned integers and negative ones to odd, then the
/// result is written in little-endian base-128 groups.
pub fn put_varint(buf: &mut [u8], value: i64) -> usize {
    let mut ux = (value as u64) << 1;
    if value < 0 {
        ux = !ux;
    }
    let mut i = 0;
    while ux >= 0x80 {
        buf[i] = (ux as u8) | 0x80;
        ux >>= 7;
        i += 1;
    }
    buf[i] = ux as u8;
    i + 1
}

/// The 8-byte key for `value`: its varint encoding padded with zeros.
pub fn varint_key(value: i64) -> [u8; 8] {
    let mut buf = [0u8; 8];
    let n = put_varint(&mut buf, value);
    assert!(n > 0, "encoding failed");
    buf
}
