#![cfg(test)]

mod harness;
mod pixelmatch;
