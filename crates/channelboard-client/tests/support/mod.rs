#![allow(dead_code)]

pub mod board_testkit;
