// Rolling accelerometer history feeding the chart
use super::bounded::BoundedQueue;
use serde::Serialize;

pub const DEFAULT_CAPACITY: usize = 40;

/// Level attitude: no lateral acceleration, 1g on Z.
const DEFAULT_X: f64 = 0.0;
const DEFAULT_Y: f64 = 0.0;
const DEFAULT_Z: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub fn from_axes(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self {
            x: x.unwrap_or(DEFAULT_X),
            y: y.unwrap_or(DEFAULT_Y),
            z: z.unwrap_or(DEFAULT_Z),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub data: Vec<f64>,
}

/// Full chart contents, handed to the display in one piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub series: [ChartSeries; 3],
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            series: [
                ChartSeries { name: "Accel-X", data: Vec::new() },
                ChartSeries { name: "Accel-Y", data: Vec::new() },
                ChartSeries { name: "Accel-Z", data: Vec::new() },
            ],
        }
    }
}

/// Three index-aligned channels. Every push touches all three, so the
/// channels always have the same length.
#[derive(Debug, Clone)]
pub struct AccelHistory {
    x: BoundedQueue<f64>,
    y: BoundedQueue<f64>,
    z: BoundedQueue<f64>,
}

impl AccelHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            x: BoundedQueue::new(capacity),
            y: BoundedQueue::new(capacity),
            z: BoundedQueue::new(capacity),
        }
    }

    pub fn push(&mut self, sample: AccelSample) {
        self.x.push(sample.x);
        self.y.push(sample.y);
        self.z.push(sample.z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn render(&self) -> ChartFrame {
        let mut frame = ChartFrame::default();
        frame.series[0].data = self.x.to_vec();
        frame.series[1].data = self.y.to_vec();
        frame.series[2].data = self.z.to_vec();
        frame
    }
}

impl Default for AccelHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
