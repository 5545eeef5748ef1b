// SPDX-License-Identifier: MIT

pub mod app_services;
pub mod data_dir;
