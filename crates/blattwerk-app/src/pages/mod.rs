// SPDX-License-Identifier: MIT

pub mod convert;
