use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use arcade_core::config::OverlayConfig;
use arcade_core::effects::{FrameClock, SurfaceSize};
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::diag;
use crate::dom;
use crate::error::{ClientError, ClientResult};

const VERT_SRC: &str = include_str!("shaders_gl/crt.vert");
const FRAG_SRC: &str = include_str!("shaders_gl/crt.frag");

/// Full-screen quad as a triangle strip.
const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// Inline style for the overlay canvas. It never takes pointer events.
fn canvas_css(z_index: i32) -> String {
    format!(
        "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
         pointer-events: none; z-index: {z_index}; mix-blend-mode: screen;"
    )
}

/// Compiled CRT program with cached uniform locations.
struct CrtProgram {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    _buffer: WebGlBuffer,
    u_time: Option<WebGlUniformLocation>,
    u_resolution: Option<WebGlUniformLocation>,
    u_opacity: Option<WebGlUniformLocation>,
}

/// Decorative CRT/VHS pass drawn over the whole page every frame.
///
/// Independent of the hub: it has no data dependency on the registry and
/// keeps running even when the grid failed to mount.
pub struct EffectsOverlay {
    inner: Rc<Inner>,
    _resize: EventListener,
    _context_listeners: [EventListener; 2],
}

struct Inner {
    gl: GL,
    canvas: HtmlCanvasElement,
    opacity: f32,
    clock: Cell<FrameClock>,
    surface: Cell<SurfaceSize>,
    program: RefCell<Option<CrtProgram>>,
    context_lost: Cell<bool>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl EffectsOverlay {
    /// Create the canvas and start the frame loop.
    ///
    /// Returns [`ClientError::GraphicsUnavailable`] when WebGL2 is missing and
    /// [`ClientError::Shader`] when the program does not build; callers treat
    /// both as "no overlay".
    pub fn start(config: &OverlayConfig) -> ClientResult<Self> {
        let document = dom::document()?;
        let canvas: HtmlCanvasElement = dom::create(&document, "canvas", "")?;
        canvas.set_id("effects-canvas");
        canvas.style().set_css_text(&canvas_css(config.z_index));

        // Explicit context attributes; the pass blends over the page.
        let attrs = web_sys::WebGlContextAttributes::new();
        attrs.set_antialias(false);
        attrs.set_depth(false);
        attrs.set_stencil(false);
        attrs.set_alpha(true);
        attrs.set_premultiplied_alpha(false);
        attrs.set_preserve_drawing_buffer(false);

        let gl = canvas
            .get_context_with_context_options("webgl2", &attrs)
            .map_err(|e| ClientError::GraphicsUnavailable(format!("getContext failed: {e:?}")))?
            .ok_or_else(|| ClientError::GraphicsUnavailable("WebGL2 not supported".into()))?
            .dyn_into::<GL>()
            .map_err(|_| ClientError::GraphicsUnavailable("not a WebGl2RenderingContext".into()))?;

        let program = CrtProgram::build(&gl)?;
        dom::body(&document)?.append_child(&canvas)?;

        let inner = Rc::new(Inner {
            gl,
            canvas,
            opacity: config.opacity,
            clock: Cell::new(FrameClock::new(config.time_step)),
            surface: Cell::new(SurfaceSize::from_viewport(0.0, 0.0)),
            program: RefCell::new(Some(program)),
            context_lost: Cell::new(false),
            frame: RefCell::new(None),
        });
        inner.resize();

        let window = dom::window()?;
        let resize = {
            let weak = Rc::downgrade(&inner);
            EventListener::new(&window, "resize", move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.resize();
                }
            })
        };
        let context_listeners = Inner::watch_context(&inner);

        Inner::request_frame(&inner);
        Ok(Self {
            inner,
            _resize: resize,
            _context_listeners: context_listeners,
        })
    }

    pub fn surface(&self) -> SurfaceSize {
        self.inner.surface.get()
    }
}

impl Inner {
    /// Match the drawing buffer to the viewport.
    fn resize(&self) {
        let Ok(window) = dom::window() else {
            return;
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let size = SurfaceSize::from_viewport(width, height);

        if size.differs_from(self.canvas.width(), self.canvas.height()) {
            self.canvas.set_width(size.width);
            self.canvas.set_height(size.height);
        }
        self.gl.viewport(0, 0, size.width as i32, size.height as i32);
        self.surface.set(size);
    }

    /// Pause on context loss; rebuild the program on the next frame after restore.
    fn watch_context(this: &Rc<Self>) -> [EventListener; 2] {
        let lost = {
            let weak = Rc::downgrade(this);
            EventListener::new_with_options(
                &this.canvas,
                "webglcontextlost",
                gloo::events::EventListenerOptions::enable_prevent_default(),
                move |event| {
                    // Allows the browser to restore the context later.
                    event.prevent_default();
                    if let Some(inner) = weak.upgrade() {
                        inner.context_lost.set(true);
                        inner.program.borrow_mut().take();
                    }
                    diag::console_warn!("WebGL context lost");
                },
            )
        };
        let restored = {
            let weak = Rc::downgrade(this);
            EventListener::new(&this.canvas, "webglcontextrestored", move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.context_lost.set(false);
                    inner.resize();
                }
                diag::console_log!("WebGL context restored");
            })
        };
        [lost, restored]
    }

    fn request_frame(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let handle = request_animation_frame(move |_timestamp| {
            if let Some(inner) = weak.upgrade() {
                inner.draw();
                Inner::request_frame(&inner);
            }
        });
        *this.frame.borrow_mut() = Some(handle);
    }

    fn draw(&self) {
        let mut clock = self.clock.get();
        let time = clock.advance();
        self.clock.set(clock);

        if self.context_lost.get() {
            return;
        }
        if self.program.borrow().is_none() {
            // Context was just restored
            match CrtProgram::build(&self.gl) {
                Ok(program) => *self.program.borrow_mut() = Some(program),
                Err(e) => {
                    // Stay paused until the next restore
                    diag::console_error!("CRT program rebuild failed: {e}");
                    self.context_lost.set(true);
                    return;
                },
            }
        }
        let program = self.program.borrow();
        let Some(crt) = program.as_ref() else {
            return;
        };

        let gl = &self.gl;
        let [w, h] = self.surface.get().resolution();
        gl.use_program(Some(&crt.program));
        set_f32(gl, &crt.u_time, time);
        set_vec2(gl, &crt.u_resolution, w, h);
        set_f32(gl, &crt.u_opacity, self.opacity);

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.bind_vertex_array(Some(&crt.vao));
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
    }
}

impl CrtProgram {
    fn build(gl: &GL) -> ClientResult<Self> {
        let program = link_program(gl, VERT_SRC, FRAG_SRC)?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| ClientError::Shader("failed to create vertex array".into()))?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = gl
            .create_buffer()
            .ok_or_else(|| ClientError::Shader("failed to create buffer".into()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, quad_bytes().as_slice(), GL::STATIC_DRAW);

        // a_position is bound to location 0 in the vertex shader
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        Ok(Self {
            u_time: gl.get_uniform_location(&program, "u_time"),
            u_resolution: gl.get_uniform_location(&program, "u_resolution"),
            u_opacity: gl.get_uniform_location(&program, "u_opacity"),
            program,
            vao,
            _buffer: buffer,
        })
    }
}

fn quad_bytes() -> Vec<u8> {
    QUAD.iter().flat_map(|v| v.to_le_bytes()).collect()
}

// --- Uniform helpers ---

fn set_f32(gl: &GL, loc: &Option<WebGlUniformLocation>, v: f32) {
    if let Some(loc) = loc {
        gl.uniform1f(Some(loc), v);
    }
}

fn set_vec2(gl: &GL, loc: &Option<WebGlUniformLocation>, x: f32, y: f32) {
    if let Some(loc) = loc {
        gl.uniform2f(Some(loc), x, y);
    }
}

// --- Shader compilation ---

fn stage_name(shader_type: u32) -> &'static str {
    if shader_type == GL::VERTEX_SHADER { "vertex" } else { "fragment" }
}

fn compile_shader(gl: &GL, shader_type: u32, source: &str) -> ClientResult<WebGlShader> {
    let stage = stage_name(shader_type);
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| ClientError::Shader(format!("no {stage} shader object")))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool() == Some(true);
    if compiled {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(&shader).unwrap_or_default();
    gl.delete_shader(Some(&shader));
    Err(ClientError::Shader(format!("{stage} stage: {log}")))
}

/// Compile both stages and link them. Shader objects never outlive this call.
fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> ClientResult<WebGlProgram> {
    let vert = compile_shader(gl, GL::VERTEX_SHADER, vert_src)?;
    let frag = match compile_shader(gl, GL::FRAGMENT_SHADER, frag_src) {
        Ok(frag) => frag,
        Err(e) => {
            gl.delete_shader(Some(&vert));
            return Err(e);
        },
    };

    let linked = gl.create_program().map(|program| {
        gl.attach_shader(&program, &vert);
        gl.attach_shader(&program, &frag);
        gl.link_program(&program);
        program
    });
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));

    let program = linked.ok_or_else(|| ClientError::Shader("no program object".into()))?;
    if gl.get_program_parameter(&program, GL::LINK_STATUS).as_bool() == Some(true) {
        return Ok(program);
    }
    let log = gl.get_program_info_log(&program).unwrap_or_default();
    gl.delete_program(Some(&program));
    Err(ClientError::Shader(format!("link: {log}")))
}
