//! Image lightbox for detail page galleries.
//!
//! `Lightbox::reduce` is a state machine over closed and open, with the open
//! state carrying the image index, zoom scale, pan offset and the origin of
//! an in-progress drag. The inline page script is a separate hand-written
//! port: it is built from the same scale constants and keeps the same
//! transitions, but nothing executes the reducer in the browser.

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 5.0;
/// Scale a double-click zooms to from 1:1
pub const ZOOM_IN_SCALE: f64 = 2.0;
/// Scale change per wheel notch
pub const WHEEL_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightboxState {
    Closed,
    Open {
        index: usize,
        scale: f64,
        offset: Point,
        /// Pointer position minus offset when the drag started
        drag_origin: Option<Point>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightboxEvent {
    /// Thumbnail at this index was clicked
    Open(usize),
    /// Click outside the image
    Close,
    Next,
    Prev,
    /// Wheel zoom; positive zooms in
    Zoom(f64),
    /// Double click
    ToggleZoom,
    DragStart(Point),
    DragMove(Point),
    DragEnd,
    Key(Key),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lightbox {
    len: usize,
    /// Main gallery cycles with arrows; the alternate menu viewer does not
    navigable: bool,
    state: LightboxState,
}

fn opened(index: usize) -> LightboxState {
    LightboxState::Open {
        index,
        scale: 1.0,
        offset: Point::ORIGIN,
        drag_origin: None,
    }
}

fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

impl Lightbox {
    pub fn new(len: usize, navigable: bool) -> Self {
        Self {
            len,
            navigable,
            state: LightboxState::Closed,
        }
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    /// Apply one input event
    pub fn reduce(&mut self, event: LightboxEvent) {
        self.state = self.next_state(event);
    }

    fn step(&self, index: usize, forward: bool) -> LightboxState {
        if !self.navigable || self.len == 0 {
            return self.state;
        }
        let next = if forward {
            (index + 1) % self.len
        } else {
            (index + self.len - 1) % self.len
        };
        opened(next)
    }

    fn next_state(&self, event: LightboxEvent) -> LightboxState {
        let LightboxState::Open {
            index,
            scale,
            offset,
            drag_origin,
        } = self.state
        else {
            return match event {
                LightboxEvent::Open(i) if i < self.len => opened(i),
                _ => self.state,
            };
        };

        match event {
            LightboxEvent::Open(i) if i < self.len => opened(i),
            LightboxEvent::Open(_) => self.state,
            LightboxEvent::Close | LightboxEvent::Key(Key::Escape) => LightboxState::Closed,
            LightboxEvent::Next | LightboxEvent::Key(Key::ArrowRight) => self.step(index, true),
            LightboxEvent::Prev | LightboxEvent::Key(Key::ArrowLeft) => self.step(index, false),
            LightboxEvent::Key(Key::Other) => self.state,
            LightboxEvent::Zoom(delta) => LightboxState::Open {
                index,
                scale: clamp_scale(scale + delta),
                offset,
                drag_origin,
            },
            LightboxEvent::ToggleZoom => {
                let scale = if scale == 1.0 { ZOOM_IN_SCALE } else { 1.0 };
                LightboxState::Open {
                    index,
                    scale,
                    offset: Point::ORIGIN,
                    drag_origin: None,
                }
            }
            LightboxEvent::DragStart(p) => LightboxState::Open {
                index,
                scale,
                offset,
                drag_origin: Some(Point::new(p.x - offset.x, p.y - offset.y)),
            },
            LightboxEvent::DragMove(p) => match drag_origin {
                Some(origin) => LightboxState::Open {
                    index,
                    scale,
                    offset: Point::new(p.x - origin.x, p.y - origin.y),
                    drag_origin,
                },
                None => self.state,
            },
            LightboxEvent::DragEnd => LightboxState::Open {
                index,
                scale,
                offset,
                drag_origin: None,
            },
        }
    }
}

const LIGHTBOX_SCRIPT: &str = r#"
  (function () {
    const MIN_SCALE = __MIN_SCALE__;
    const MAX_SCALE = __MAX_SCALE__;
    const ZOOM_IN_SCALE = __ZOOM_IN_SCALE__;
    const WHEEL_STEP = __WHEEL_STEP__;

    function lightbox(root, images, navigable) {
      if (!root || images.length === 0) return;
      const img = root.querySelector('img');
      let state = null;

      function apply() {
        if (!state) {
          root.classList.remove('open');
          return;
        }
        root.classList.add('open');
        img.src = images[state.index].src;
        img.alt = images[state.index].alt;
        img.style.transform =
          `translate(${state.offset.x}px, ${state.offset.y}px) scale(${state.scale})`;
      }

      function open(index) {
        state = { index, scale: 1, offset: { x: 0, y: 0 }, drag: null };
        apply();
      }

      function close() {
        state = null;
        apply();
      }

      function step(delta) {
        if (!state || !navigable) return;
        open((state.index + delta + images.length) % images.length);
      }

      images.forEach((thumb, i) => thumb.addEventListener('click', () => open(i)));

      root.addEventListener('click', e => {
        if (e.target !== img) close();
      });

      const prev = root.querySelector('.lightbox-prev');
      const next = root.querySelector('.lightbox-next');
      if (prev) prev.addEventListener('click', e => { e.stopPropagation(); step(-1); });
      if (next) next.addEventListener('click', e => { e.stopPropagation(); step(1); });

      document.addEventListener('keydown', e => {
        if (!state) return;
        if (e.key === 'Escape') close();
        else if (e.key === 'ArrowRight') step(1);
        else if (e.key === 'ArrowLeft') step(-1);
      });

      img.addEventListener('wheel', e => {
        if (!state) return;
        e.preventDefault();
        const delta = e.deltaY < 0 ? WHEEL_STEP : -WHEEL_STEP;
        state.scale = Math.min(MAX_SCALE, Math.max(MIN_SCALE, state.scale + delta));
        apply();
      }, { passive: false });

      img.addEventListener('dblclick', () => {
        if (!state) return;
        state.scale = state.scale === 1 ? ZOOM_IN_SCALE : 1;
        state.offset = { x: 0, y: 0 };
        state.drag = null;
        apply();
      });

      img.addEventListener('pointerdown', e => {
        if (!state) return;
        e.preventDefault();
        state.drag = { x: e.clientX - state.offset.x, y: e.clientY - state.offset.y };
      });

      window.addEventListener('pointermove', e => {
        if (!state || !state.drag) return;
        state.offset = { x: e.clientX - state.drag.x, y: e.clientY - state.drag.y };
        apply();
      });

      window.addEventListener('pointerup', () => {
        if (state) state.drag = null;
      });
    }

    lightbox(
      document.getElementById('lightbox'),
      Array.from(document.querySelectorAll('.screenshots img')),
      true
    );
    lightbox(
      document.getElementById('altLightbox'),
      Array.from(document.querySelectorAll('.alt-menu img')),
      false
    );
  })();
"#;

/// Inline page script wiring both lightbox instances to the DOM
pub fn lightbox_script() -> String {
    LIGHTBOX_SCRIPT
        .replace("__MIN_SCALE__", &format!("{:.1}", MIN_SCALE))
        .replace("__MAX_SCALE__", &format!("{:.1}", MAX_SCALE))
        .replace("__ZOOM_IN_SCALE__", &format!("{:.1}", ZOOM_IN_SCALE))
        .replace("__WHEEL_STEP__", &format!("{:.1}", WHEEL_STEP))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_at(lightbox: &Lightbox) -> (usize, f64, Point) {
        match lightbox.state() {
            LightboxState::Open {
                index,
                scale,
                offset,
                ..
            } => (index, scale, offset),
            LightboxState::Closed => panic!("lightbox is closed"),
        }
    }

    #[test]
    fn test_open_and_close() {
        let mut lb = Lightbox::new(3, true);
        assert!(!lb.is_open());
        lb.reduce(LightboxEvent::Open(1));
        assert_eq!(open_at(&lb), (1, 1.0, Point::ORIGIN));
        lb.reduce(LightboxEvent::Key(Key::Escape));
        assert!(!lb.is_open());
        lb.reduce(LightboxEvent::Open(2));
        lb.reduce(LightboxEvent::Close);
        assert_eq!(lb.state(), LightboxState::Closed);
    }

    #[test]
    fn test_open_out_of_range_is_ignored() {
        let mut lb = Lightbox::new(2, true);
        lb.reduce(LightboxEvent::Open(5));
        assert!(!lb.is_open());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut lb = Lightbox::new(3, true);
        lb.reduce(LightboxEvent::Open(2));
        lb.reduce(LightboxEvent::Next);
        assert_eq!(open_at(&lb).0, 0);
        lb.reduce(LightboxEvent::Key(Key::ArrowLeft));
        assert_eq!(open_at(&lb).0, 2);
        lb.reduce(LightboxEvent::Prev);
        assert_eq!(open_at(&lb).0, 1);
    }

    #[test]
    fn test_navigation_resets_zoom_and_pan() {
        let mut lb = Lightbox::new(3, true);
        lb.reduce(LightboxEvent::Open(0));
        lb.reduce(LightboxEvent::Zoom(1.0));
        lb.reduce(LightboxEvent::DragStart(Point::new(10.0, 10.0)));
        lb.reduce(LightboxEvent::DragMove(Point::new(40.0, 30.0)));
        lb.reduce(LightboxEvent::Key(Key::ArrowRight));
        assert_eq!(open_at(&lb), (1, 1.0, Point::ORIGIN));
    }

    #[test]
    fn test_alternate_viewer_has_no_navigation() {
        let mut lb = Lightbox::new(3, false);
        lb.reduce(LightboxEvent::Open(1));
        lb.reduce(LightboxEvent::Next);
        lb.reduce(LightboxEvent::Key(Key::ArrowLeft));
        assert_eq!(open_at(&lb).0, 1);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut lb = Lightbox::new(1, true);
        lb.reduce(LightboxEvent::Open(0));
        lb.reduce(LightboxEvent::Zoom(10.0));
        assert_eq!(open_at(&lb).1, MAX_SCALE);
        lb.reduce(LightboxEvent::Zoom(-10.0));
        assert_eq!(open_at(&lb).1, MIN_SCALE);
    }

    #[test]
    fn test_double_click_toggles_zoom() {
        let mut lb = Lightbox::new(1, true);
        lb.reduce(LightboxEvent::Open(0));
        lb.reduce(LightboxEvent::ToggleZoom);
        assert_eq!(open_at(&lb).1, ZOOM_IN_SCALE);
        lb.reduce(LightboxEvent::ToggleZoom);
        assert_eq!(open_at(&lb).1, 1.0);
    }

    #[test]
    fn test_drag_pans_from_current_offset() {
        let mut lb = Lightbox::new(1, true);
        lb.reduce(LightboxEvent::Open(0));
        lb.reduce(LightboxEvent::DragMove(Point::new(50.0, 50.0)));
        assert_eq!(open_at(&lb).2, Point::ORIGIN);

        lb.reduce(LightboxEvent::DragStart(Point::new(100.0, 100.0)));
        lb.reduce(LightboxEvent::DragMove(Point::new(130.0, 90.0)));
        assert_eq!(open_at(&lb).2, Point::new(30.0, -10.0));
        lb.reduce(LightboxEvent::DragEnd);

        lb.reduce(LightboxEvent::DragStart(Point::new(0.0, 0.0)));
        lb.reduce(LightboxEvent::DragMove(Point::new(5.0, 5.0)));
        assert_eq!(open_at(&lb).2, Point::new(35.0, -5.0));

        lb.reduce(LightboxEvent::Close);
        lb.reduce(LightboxEvent::Open(0));
        assert_eq!(open_at(&lb).2, Point::ORIGIN);
    }

    #[test]
    fn test_events_while_closed_are_ignored() {
        let mut lb = Lightbox::new(2, true);
        lb.reduce(LightboxEvent::Next);
        lb.reduce(LightboxEvent::Zoom(1.0));
        lb.reduce(LightboxEvent::DragStart(Point::ORIGIN));
        assert_eq!(lb.state(), LightboxState::Closed);
    }

    #[test]
    fn test_script_uses_reducer_constants() {
        let script = lightbox_script();
        assert!(script.contains("const MIN_SCALE = 0.5;"));
        assert!(script.contains("const MAX_SCALE = 5.0;"));
        assert!(script.contains("state.scale === 1 ? ZOOM_IN_SCALE : 1"));
        assert!(!script.contains("__"));
    }
}
