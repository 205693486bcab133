// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode, flatten, enhance and downscale images before they
// are placed into a PDF.

pub mod processor;

pub use processor::ImageProcessor;
